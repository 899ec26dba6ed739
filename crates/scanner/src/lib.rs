//! Numeric literal scanner for shader source.
//!
//! Given a line of GLSL and a caret column (or a selection), finds the
//! numeric literal under it together with its exact span, its raw text and
//! the operator written in front of it. The operator matters to whoever
//! writes a replacement value back: `x - 1.0` cannot simply become
//! `x - -2.0`.
//!
//! Scanning never fails loudly. Out-of-range positions, bad selections and
//! unparsable tokens all come back as "no literal here".

mod float;
pub mod literal;
pub mod token;

pub use float::parse_float_prefix;
pub use literal::{LiteralMatch, scan, scan_all, scan_at_position_or_selection};
pub use token::{LineState, NumberKind, Token, TokenKind, Tokenizer, literal_value};
