//! Rope-backed [`TextHost`] implementation.

use ropey::Rope;

use crate::buffer::{BufferError, TextHost};
use crate::position::{TextPosition, TextRange, utf16_to_byte};
use crate::selection::Selection;

/// An in-memory document with a caret and an optional selection.
#[derive(Debug, Clone)]
pub struct RopeBuffer {
	text: Rope,
	cursor: TextPosition,
	selection: Option<Selection>,
}

impl RopeBuffer {
	/// Creates a buffer with the caret at the start of the document.
	pub fn new(text: &str) -> Self {
		Self {
			text: Rope::from_str(text),
			cursor: TextPosition::new(1, 1),
			selection: None,
		}
	}

	/// Returns the buffer with the caret moved to `pos`.
	pub fn with_cursor(mut self, pos: TextPosition) -> Self {
		self.set_cursor(pos);
		self
	}

	/// Returns the buffer with `selection` active.
	pub fn with_selection(mut self, selection: Selection) -> Self {
		self.set_selection(selection);
		self
	}

	/// Activates a selection; the caret follows its head.
	pub fn set_selection(&mut self, selection: Selection) {
		self.cursor = selection.head;
		self.selection = Some(selection);
	}

	fn line_index(&self, line: u32) -> Result<usize, BufferError> {
		let line_count = self.line_count();
		if line == 0 || line > line_count {
			return Err(BufferError::LineOutOfBounds { line, line_count });
		}
		Ok(line as usize - 1)
	}

	fn line_content(&self, idx: usize) -> String {
		let mut line = self.text.line(idx).to_string();
		if line.ends_with('\n') {
			line.pop();
		}
		if line.ends_with('\r') {
			line.pop();
		}
		line
	}

	fn char_idx(&self, pos: TextPosition) -> Result<usize, BufferError> {
		let idx = self.line_index(pos.line)?;
		let line = self.line_content(idx);
		let out_of_bounds = BufferError::ColumnOutOfBounds {
			line: pos.line,
			column: pos.column,
		};
		let col = pos.column.checked_sub(1).ok_or(out_of_bounds.clone())?;
		let byte = utf16_to_byte(&line, col).ok_or(out_of_bounds)?;
		Ok(self.text.line_to_char(idx) + line[..byte].chars().count())
	}

	fn char_span(&self, range: TextRange) -> Result<std::ops::Range<usize>, BufferError> {
		if !range.is_ordered() {
			return Err(BufferError::InvertedRange(range));
		}
		Ok(self.char_idx(range.start())?..self.char_idx(range.end())?)
	}
}

impl Default for RopeBuffer {
	fn default() -> Self {
		Self::new("")
	}
}

impl TextHost for RopeBuffer {
	fn line_count(&self) -> u32 {
		self.text.len_lines() as u32
	}

	fn line_text(&self, line: u32) -> Result<String, BufferError> {
		let idx = self.line_index(line)?;
		Ok(self.line_content(idx))
	}

	fn text_in_range(&self, range: TextRange) -> Result<String, BufferError> {
		let span = self.char_span(range)?;
		Ok(self.text.slice(span).to_string())
	}

	fn replace_range(&mut self, range: TextRange, text: &str) -> Result<TextRange, BufferError> {
		let span = self.char_span(range)?;
		let start = span.start;
		self.text.remove(span);
		self.text.insert(start, text);
		Ok(TextRange::spanning_text(range.start(), text))
	}

	fn cursor(&self) -> TextPosition {
		self.cursor
	}

	fn selection(&self) -> Option<Selection> {
		self.selection
	}

	fn set_cursor(&mut self, pos: TextPosition) {
		self.cursor = pos;
		self.selection = None;
	}

	fn text(&self) -> String {
		self.text.to_string()
	}

	fn set_text(&mut self, text: &str) {
		self.text = Rope::from_str(text);
		self.selection = None;
	}
}
