//! The text host seam.
//!
//! The live-edit core never owns the editor's document. It talks to it
//! through [`TextHost`], which the embedding application implements over its
//! editor widget. [`RopeBuffer`](crate::RopeBuffer) is the in-process
//! implementation used by the relay binary and the tests.

use thiserror::Error;

use crate::position::{TextPosition, TextRange};
use crate::selection::Selection;

/// Errors raised by a text host when a position or range does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
	/// The line number is zero or past the last line.
	#[error("line {line} is out of bounds ({line_count} lines)")]
	LineOutOfBounds {
		/// Requested line.
		line: u32,
		/// Lines in the buffer.
		line_count: u32,
	},
	/// The column is zero, past the end of the line, or inside a surrogate pair.
	#[error("column {column} is out of bounds on line {line}")]
	ColumnOutOfBounds {
		/// Line of the bad position.
		line: u32,
		/// Requested column.
		column: u32,
	},
	/// The range ends before it starts.
	#[error("range {0:?} ends before it starts")]
	InvertedRange(TextRange),
}

/// Editing surface the core needs from the host editor.
///
/// Every mutation is a single atomic range replace so the host can record it
/// as one undo step.
pub trait TextHost {
	/// Number of lines in the document.
	fn line_count(&self) -> u32;

	/// Text of a 1-based line, without its line terminator.
	fn line_text(&self, line: u32) -> Result<String, BufferError>;

	/// Text covered by `range`.
	fn text_in_range(&self, range: TextRange) -> Result<String, BufferError>;

	/// Replaces `range` with `text` and returns the range the new text covers.
	fn replace_range(&mut self, range: TextRange, text: &str) -> Result<TextRange, BufferError>;

	/// Current caret position.
	fn cursor(&self) -> TextPosition;

	/// Current primary selection, if the host tracks one.
	fn selection(&self) -> Option<Selection>;

	/// Moves the caret, collapsing any selection.
	fn set_cursor(&mut self, pos: TextPosition);

	/// Full document text.
	fn text(&self) -> String;

	/// Replaces the full document text.
	fn set_text(&mut self, text: &str);
}
