//! Keyboard modifier state carried by stepping gestures.

mod modifiers;

pub use modifiers::Modifiers;
