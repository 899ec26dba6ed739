//! Line/column coordinates in the host editor's convention.
//!
//! Lines and columns are 1-based. Columns count UTF-16 code units, so a
//! character outside the Basic Multilingual Plane occupies two columns. This
//! matches the coordinate space of the editor widget the core is embedded in,
//! which lets ranges cross the seam without conversion.


/// A caret position: 1-based line, 1-based UTF-16 column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextPosition {
	/// Line number, starting at 1.
	pub line: u32,
	/// Column in UTF-16 code units, starting at 1.
	pub column: u32,
}

impl TextPosition {
	/// Creates a new position.
	pub const fn new(line: u32, column: u32) -> Self {
		Self { line, column }
	}
}

/// A half-open span between two positions.
///
/// `end_column` is exclusive: a range over the single character at column 3
/// has `start_column == 3` and `end_column == 4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
	/// First line of the span.
	pub start_line: u32,
	/// First column of the span (inclusive).
	pub start_column: u32,
	/// Last line of the span.
	pub end_line: u32,
	/// Column past the end of the span (exclusive).
	pub end_column: u32,
}

impl TextRange {
	/// Creates a range from raw coordinates.
	pub const fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
		Self {
			start_line,
			start_column,
			end_line,
			end_column,
		}
	}

	/// Creates a range between two positions, ordering them first.
	pub fn between(a: TextPosition, b: TextPosition) -> Self {
		let (start, end) = if a <= b { (a, b) } else { (b, a) };
		Self::new(start.line, start.column, end.line, end.column)
	}

	/// Creates a range on one line spanning `width` UTF-16 units from `start`.
	pub const fn on_line(line: u32, start_column: u32, width: u32) -> Self {
		Self::new(line, start_column, line, start_column + width)
	}

	/// Start position.
	pub const fn start(&self) -> TextPosition {
		TextPosition::new(self.start_line, self.start_column)
	}

	/// End position (exclusive).
	pub const fn end(&self) -> TextPosition {
		TextPosition::new(self.end_line, self.end_column)
	}

	/// Returns true if the range covers no text.
	pub fn is_empty(&self) -> bool {
		self.start() == self.end()
	}

	/// Returns true if start and end are on the same line.
	pub fn is_single_line(&self) -> bool {
		self.start_line == self.end_line
	}

	/// Returns true if `start <= end`.
	pub fn is_ordered(&self) -> bool {
		self.start() <= self.end()
	}

	/// Computes the range `text` occupies once inserted at `start`.
	pub fn spanning_text(start: TextPosition, text: &str) -> Self {
		let mut segments = text.split('\n');
		let first = segments.next().unwrap_or_default();
		let mut end = TextPosition::new(start.line, start.column + utf16_len(first));
		for segment in segments {
			end = TextPosition::new(end.line + 1, 1 + utf16_len(segment));
		}
		Self::new(start.line, start.column, end.line, end.column)
	}
}

/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> u32 {
	text.chars().map(|ch| ch.len_utf16() as u32).sum()
}

/// Converts a zero-based UTF-16 offset within `line` to a byte offset.
///
/// Returns `None` if the offset lies past the end of the line or splits a
/// surrogate pair.
pub fn utf16_to_byte(line: &str, utf16_offset: u32) -> Option<usize> {
	let mut units = 0u32;
	for (byte, ch) in line.char_indices() {
		if units == utf16_offset {
			return Some(byte);
		}
		units += ch.len_utf16() as u32;
		if units > utf16_offset {
			return None;
		}
	}
	(units == utf16_offset).then_some(line.len())
}
