//! Literal lookup under the caret or selection.

use glint_primitives::position::utf16_to_byte;
use glint_primitives::{Selection, TextHost, TextPosition, TextRange};
use tracing::trace;

use crate::float::parse_float_prefix;
use crate::token::{LineState, Token, TokenKind, Tokenizer, literal_value};


/// A numeric literal found in source text.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralMatch {
	/// Parsed value of the literal.
	pub value: f64,
	/// Exact span of `original_text` in the document.
	pub range: TextRange,
	/// Raw source text, type suffix included.
	pub original_text: String,
	/// Nearest operator before the literal, skipping whitespace.
	pub preceding_operator: Option<String>,
}

/// Finds the literal whose column span contains `cursor_column`.
///
/// Both boundary columns count as inside, so a caret resting just after
/// `1.0f` still picks it up.
pub fn scan(line: &str, line_number: u32, cursor_column: u32) -> Option<LiteralMatch> {
	scan_from(line, line_number, cursor_column, LineState::default())
}

fn scan_from(line: &str, line_number: u32, cursor_column: u32, state: LineState) -> Option<LiteralMatch> {
	let tokens: Vec<Token<'_>> = Tokenizer::with_state(line, state).collect();
	let idx = tokens.iter().position(|t| {
		let start = t.utf16_start + 1;
		t.is_number() && (start..=start + t.utf16_len()).contains(&cursor_column)
	})?;
	literal_at(&tokens, idx, line_number)
}

/// Scans the selection if it holds a number, otherwise the caret position.
///
/// A non-empty selection is parsed as a float directly, which lets the user
/// nudge text the tokenizer would not isolate on its own.
pub fn scan_at_position_or_selection<H>(
	host: &H,
	position: TextPosition,
	selection: Option<Selection>,
) -> Option<LiteralMatch>
where
	H: TextHost + ?Sized,
{
	if let Some(selection) = selection.filter(|s| !s.is_empty())
		&& let Some(found) = scan_selection(host, selection)
	{
		return Some(found);
	}

	let line = match host.line_text(position.line) {
		Ok(line) => line,
		Err(err) => {
			trace!(%err, "literal scan skipped");
			return None;
		}
	};
	scan_from(&line, position.line, position.column, state_before(host, position.line))
}

/// Tokenizer state at the start of `line_number`, carried from line 1.
fn state_before<H>(host: &H, line_number: u32) -> LineState
where
	H: TextHost + ?Sized,
{
	let mut state = LineState::default();
	for earlier in 1..line_number {
		let Ok(line) = host.line_text(earlier) else {
			continue;
		};
		let mut tokenizer = Tokenizer::with_state(&line, state);
		tokenizer.by_ref().for_each(drop);
		state = tokenizer.state();
	}
	state
}

/// Every literal in the document, in order.
pub fn scan_all<H>(host: &H) -> Vec<LiteralMatch>
where
	H: TextHost + ?Sized,
{
	let mut found = Vec::new();
	let mut state = LineState::default();

	for line_number in 1..=host.line_count() {
		let Ok(line) = host.line_text(line_number) else {
			continue;
		};
		let mut tokenizer = Tokenizer::with_state(&line, state);
		let tokens: Vec<Token<'_>> = tokenizer.by_ref().collect();
		state = tokenizer.state();

		found.extend(
			(0..tokens.len())
				.filter(|&idx| tokens[idx].is_number())
				.filter_map(|idx| literal_at(&tokens, idx, line_number)),
		);
	}

	found
}

fn literal_at(tokens: &[Token<'_>], idx: usize, line_number: u32) -> Option<LiteralMatch> {
	let token = tokens[idx];
	let TokenKind::Number(kind) = token.kind else {
		return None;
	};
	let Some(value) = literal_value(token.text, kind) else {
		trace!(text = token.text, "unparsable literal");
		return None;
	};

	Some(LiteralMatch {
		value,
		range: TextRange::on_line(line_number, token.utf16_start + 1, token.utf16_len()),
		original_text: token.text.to_string(),
		preceding_operator: preceding_operator(&tokens[..idx]),
	})
}

fn scan_selection<H>(host: &H, selection: Selection) -> Option<LiteralMatch>
where
	H: TextHost + ?Sized,
{
	let range = selection.range();
	let text = host
		.text_in_range(range)
		.inspect_err(|err| trace!(%err, "selection scan skipped"))
		.ok()?;
	let value = parse_float_prefix(&text)?;

	let line = host.line_text(range.start_line).ok()?;
	let start = utf16_to_byte(&line, range.start_column.saturating_sub(1))?;
	let before: Vec<Token<'_>> = Tokenizer::with_state(&line, state_before(host, range.start_line))
		.take_while(|t| t.end() <= start)
		.collect();

	Some(LiteralMatch {
		value,
		range,
		original_text: text,
		preceding_operator: preceding_operator(&before),
	})
}

fn preceding_operator(before: &[Token<'_>]) -> Option<String> {
	before
		.iter()
		.rev()
		.find(|t| t.kind != TokenKind::Whitespace)
		.filter(|t| t.kind == TokenKind::Operator)
		.map(|t| t.text.to_string())
}
