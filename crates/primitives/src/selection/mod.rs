use crate::position::{TextPosition, TextRange};


/// A primary selection defined by anchor and head positions.
///
/// The anchor is where the selection started; the head is where the caret
/// is. Either may come first in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
	/// The fixed end of the selection.
	pub anchor: TextPosition,
	/// The moving end of the selection (caret).
	pub head: TextPosition,
}

impl Selection {
	/// Creates a selection from anchor to head.
	pub const fn new(anchor: TextPosition, head: TextPosition) -> Self {
		Self { anchor, head }
	}

	/// Creates an empty selection at a caret position.
	pub const fn caret(pos: TextPosition) -> Self {
		Self::new(pos, pos)
	}

	/// Returns true if anchor equals head.
	pub fn is_empty(&self) -> bool {
		self.anchor == self.head
	}

	/// Returns the selected span with start before end.
	pub fn range(&self) -> TextRange {
		TextRange::between(self.anchor, self.head)
	}

	/// Returns true if the head sits before the anchor.
	pub fn is_reversed(&self) -> bool {
		self.head < self.anchor
	}
}
