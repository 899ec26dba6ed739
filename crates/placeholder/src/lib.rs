//! Placeholder staging protocol.
//!
//! While a literal is being nudged, its text in the document is replaced by a
//! reserved uniform name so the renderer can drive the value live. The
//! protocol has three operations, each a single atomic range replace:
//!
//! * [`Placeholder::stage`] swaps the literal for the placeholder.
//! * [`Placeholder::commit`] swaps the placeholder for the final value.
//! * [`Placeholder::cancel`] swaps the placeholder back to the original text.
//!
//! Commit and cancel are terminal: exactly one of them runs per stage.

use glint_primitives::{BufferError, TextHost, TextRange};
use glint_scanner::{LineState, LiteralMatch, TokenKind, Tokenizer};
use thiserror::Error;
use tracing::trace;


/// Placeholder symbol used when none is configured.
pub const DEFAULT_PLACEHOLDER: &str = "u_inline1f";

/// Failures of the staging protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceholderError {
	/// The symbol is not a usable GLSL identifier.
	#[error("invalid placeholder symbol {0:?}")]
	InvalidSymbol(String),
	/// The literal's text changed between scan and stage.
	#[error("literal at {range:?} changed before staging: expected {expected:?}, found {found:?}")]
	StaleMatch {
		/// Range the scan reported.
		range: TextRange,
		/// Text the scan saw.
		expected: String,
		/// Text now in the document.
		found: String,
	},
	/// The document already uses the placeholder symbol.
	#[error("placeholder {0:?} already appears in the document")]
	Collision(String),
	/// The staged range no longer holds the placeholder.
	#[error("placeholder missing at {range:?}: found {found:?}")]
	PlaceholderMissing {
		/// Staged range.
		range: TextRange,
		/// Text now in the range.
		found: String,
	},
	/// The host rejected a range.
	#[error(transparent)]
	Buffer(#[from] BufferError),
}

/// The reserved identifier written in place of a literal during a nudge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
	symbol: String,
}

impl Default for Placeholder {
	fn default() -> Self {
		Self {
			symbol: DEFAULT_PLACEHOLDER.to_string(),
		}
	}
}

impl Placeholder {
	/// Creates a placeholder, validating the symbol.
	///
	/// The symbol must be an identifier (`[A-Za-z_][A-Za-z0-9_]*`), must not
	/// start with `gl_` and must not contain `__`; GLSL reserves both.
	pub fn new(symbol: impl Into<String>) -> Result<Self, PlaceholderError> {
		let symbol = symbol.into();
		let mut chars = symbol.chars();
		let valid_head = chars
			.next()
			.is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
		let valid_tail = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
		if !valid_head || !valid_tail || symbol.starts_with("gl_") || symbol.contains("__") {
			return Err(PlaceholderError::InvalidSymbol(symbol));
		}
		Ok(Self { symbol })
	}

	/// The symbol text.
	pub fn symbol(&self) -> &str {
		&self.symbol
	}

	/// Returns true if the symbol already occurs as an identifier in the document.
	pub fn appears_in<H>(&self, host: &H) -> bool
	where
		H: TextHost + ?Sized,
	{
		let mut state = LineState::default();
		for line_number in 1..=host.line_count() {
			let Ok(line) = host.line_text(line_number) else {
				continue;
			};
			let mut tokenizer = Tokenizer::with_state(&line, state);
			if tokenizer
				.by_ref()
				.any(|t| t.kind == TokenKind::Identifier && t.text == self.symbol)
			{
				return true;
			}
			state = tokenizer.state();
		}
		false
	}

	/// Replaces the literal with the placeholder.
	///
	/// Returns the range covering exactly the placeholder, anchored at the
	/// literal's start.
	pub fn stage<H>(&self, host: &mut H, found: &LiteralMatch) -> Result<TextRange, PlaceholderError>
	where
		H: TextHost + ?Sized,
	{
		let current = host.text_in_range(found.range)?;
		if current != found.original_text {
			return Err(PlaceholderError::StaleMatch {
				range: found.range,
				expected: found.original_text.clone(),
				found: current,
			});
		}
		if self.appears_in(host) {
			return Err(PlaceholderError::Collision(self.symbol.clone()));
		}

		let staged = host.replace_range(found.range, &self.symbol)?;
		trace!(?staged, original = %found.original_text, "placeholder staged");
		Ok(staged)
	}

	/// Writes `value` over the placeholder and returns the written text.
	pub fn commit<H>(
		&self,
		host: &mut H,
		staged: TextRange,
		value: f64,
		preceding_operator: Option<&str>,
	) -> Result<String, PlaceholderError>
	where
		H: TextHost + ?Sized,
	{
		self.expect_placeholder(host, staged)?;
		let text = format_value(value, preceding_operator);
		host.replace_range(staged, &text)?;
		trace!(?staged, %text, "placeholder committed");
		Ok(text)
	}

	/// Restores `original_text` over the placeholder.
	pub fn cancel<H>(&self, host: &mut H, staged: TextRange, original_text: &str) -> Result<(), PlaceholderError>
	where
		H: TextHost + ?Sized,
	{
		self.expect_placeholder(host, staged)?;
		host.replace_range(staged, original_text)?;
		trace!(?staged, original = %original_text, "placeholder cancelled");
		Ok(())
	}

	fn expect_placeholder<H>(&self, host: &H, staged: TextRange) -> Result<(), PlaceholderError>
	where
		H: TextHost + ?Sized,
	{
		let found = host.text_in_range(staged)?;
		if found != self.symbol {
			return Err(PlaceholderError::PlaceholderMissing { range: staged, found });
		}
		Ok(())
	}
}

/// Formats a committed value for insertion after `preceding_operator`.
///
/// Negative values written right after a binary `-` are parenthesized so the
/// result never reads as `x - -1` (GLSL would lex `--`). Any other operator
/// keeps the bare number: `x + -1` and `x * -1` are unambiguous.
///
/// Magnitudes of `1e21` and above, or below `1e-6`, are written in exponent
/// form (`1e21`, `2.5e-7`) rather than as long digit runs.
pub fn format_value(value: f64, preceding_operator: Option<&str>) -> String {
	// -0.0 would otherwise print as "-0"
	let value = if value == 0.0 { 0.0 } else { value };
	let magnitude = value.abs();
	let text = if magnitude >= 1e21 || (magnitude != 0.0 && magnitude < 1e-6) {
		format!("{value:e}")
	} else {
		value.to_string()
	};
	if value < 0.0 && preceding_operator == Some("-") {
		format!("({text})")
	} else {
		text
	}
}
