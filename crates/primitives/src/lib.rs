//! Core types shared by the live-edit crates: coordinates, selections and
//! the text host seam.

/// The text host trait and its error type.
pub mod buffer;
/// Keyboard modifier state.
pub mod key;
/// 1-based line/column coordinates in UTF-16 units.
pub mod position;
/// Rope-backed text host.
pub mod rope;
/// Anchor/head selections.
pub mod selection;

pub use buffer::{BufferError, TextHost};
pub use key::Modifiers;
pub use position::{TextPosition, TextRange, utf16_len};
pub use rope::RopeBuffer;
pub use selection::Selection;
