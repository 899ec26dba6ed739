use glint_primitives::TextRange;
use glint_scanner::LiteralMatch;

/// The literal currently under edit.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
	/// The scan result the session was opened from.
	pub anchor: LiteralMatch,
	/// Range of the placeholder written over `anchor.range`.
	pub staged_range: TextRange,
	/// Latest live value.
	pub current_value: f64,
	pub original_value: f64,
	pub original_text: String,
}

impl EditSession {
	pub fn new(anchor: LiteralMatch, staged_range: TextRange) -> Self {
		Self {
			staged_range,
			current_value: anchor.value,
			original_value: anchor.value,
			original_text: anchor.original_text.clone(),
			anchor,
		}
	}

	pub fn preceding_operator(&self) -> Option<&str> {
		self.anchor.preceding_operator.as_deref()
	}
}
