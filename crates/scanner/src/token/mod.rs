//! Line tokenizer for GLSL source.
//!
//! Classifies a line into whitespace, comments, identifiers, numeric literals,
//! operators and delimiters. Token boundaries follow the GLSL literal grammar
//! so a literal's span includes its type suffix (`1.0f`, `2lf`, `7u`).

use glint_primitives::utf16_len;


/// Flavour of a numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
	/// Floating point literal (`1.0`, `.5`, `2e3`, `1f`, `3.0lf`).
	Float,
	/// Decimal integer (`42`, `7u`).
	Decimal,
	/// Octal integer (`017`).
	Octal,
	/// Hexadecimal integer (`0xFF`, `0x1Fu`).
	Hex,
}

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
	/// Run of whitespace.
	Whitespace,
	/// Line comment or (part of) a block comment.
	Comment,
	/// Identifier or keyword.
	Identifier,
	/// Numeric literal.
	Number(NumberKind),
	/// Run of operator characters (`-`, `+=`, `--`, `==`).
	Operator,
	/// Punctuation: `( ) [ ] { } ; , .`
	Delimiter,
	/// Anything else (`#`, quotes, non-ASCII symbols).
	Other,
}

/// A classified slice of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
	/// Classification.
	pub kind: TokenKind,
	/// Source text of the token.
	pub text: &'a str,
	/// Byte offset of the token in the line.
	pub start: usize,
	/// Zero-based UTF-16 offset of the token in the line.
	pub utf16_start: u32,
}

impl Token<'_> {
	/// Byte offset past the token.
	pub fn end(&self) -> usize {
		self.start + self.text.len()
	}

	/// Width of the token in UTF-16 units.
	pub fn utf16_len(&self) -> u32 {
		utf16_len(self.text)
	}

	/// Returns true for numeric literal tokens.
	pub fn is_number(&self) -> bool {
		matches!(self.kind, TokenKind::Number(_))
	}
}

/// Tokenizer state carried from one line to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineState {
	/// The line ended inside an unterminated `/* ... */` comment.
	pub in_block_comment: bool,
}

/// Iterator over the tokens of a single line.
pub struct Tokenizer<'a> {
	src: &'a str,
	pos: usize,
	utf16_pos: u32,
	state: LineState,
}

impl<'a> Tokenizer<'a> {
	/// Tokenizes `line` from a fresh state.
	pub fn new(line: &'a str) -> Self {
		Self::with_state(line, LineState::default())
	}

	/// Tokenizes `line` continuing from the previous line's state.
	pub fn with_state(line: &'a str, state: LineState) -> Self {
		Self {
			src: line,
			pos: 0,
			utf16_pos: 0,
			state,
		}
	}

	/// State after the tokens consumed so far.
	pub fn state(&self) -> LineState {
		self.state
	}

	fn classify(&mut self, rest: &str) -> (TokenKind, usize) {
		if self.state.in_block_comment {
			return match rest.find("*/") {
				Some(i) => {
					self.state.in_block_comment = false;
					(TokenKind::Comment, i + 2)
				}
				None => (TokenKind::Comment, rest.len()),
			};
		}

		let mut chars = rest.chars();
		let Some(c) = chars.next() else {
			return (TokenKind::Other, 0);
		};
		let next = chars.next();

		if c.is_whitespace() {
			return (TokenKind::Whitespace, run_len(rest, char::is_whitespace));
		}
		if rest.starts_with("//") {
			return (TokenKind::Comment, rest.len());
		}
		if rest.starts_with("/*") {
			return match rest[2..].find("*/") {
				Some(i) => (TokenKind::Comment, i + 4),
				None => {
					self.state.in_block_comment = true;
					(TokenKind::Comment, rest.len())
				}
			};
		}
		if c.is_ascii_digit() || (c == '.' && next.is_some_and(|n| n.is_ascii_digit())) {
			let (kind, len) = lex_number(rest);
			return (TokenKind::Number(kind), len);
		}
		if c.is_alphabetic() || c == '_' {
			return (
				TokenKind::Identifier,
				run_len(rest, |ch| ch.is_alphanumeric() || ch == '_'),
			);
		}
		if is_operator_char(c) {
			return (TokenKind::Operator, operator_len(rest));
		}
		if matches!(c, '(' | ')' | '[' | ']' | '{' | '}' | ';' | ',' | '.') {
			return (TokenKind::Delimiter, 1);
		}
		(TokenKind::Other, c.len_utf8())
	}
}

impl<'a> Iterator for Tokenizer<'a> {
	type Item = Token<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		let src = self.src;
		let rest = &src[self.pos..];
		if rest.is_empty() {
			return None;
		}

		let (kind, len) = self.classify(rest);
		let token = Token {
			kind,
			text: &rest[..len],
			start: self.pos,
			utf16_start: self.utf16_pos,
		};
		self.pos += len;
		self.utf16_pos += token.utf16_len();
		Some(token)
	}
}

fn run_len(s: &str, pred: impl Fn(char) -> bool) -> usize {
	s.char_indices()
		.find(|&(_, ch)| !pred(ch))
		.map_or(s.len(), |(i, _)| i)
}

fn is_operator_char(c: char) -> bool {
	matches!(
		c,
		'=' | '>' | '<' | '!' | '~' | '?' | ':' | '&' | '|' | '+' | '-' | '*' | '/' | '^' | '%'
	)
}

/// Greedy operator run that stops before a comment opener.
fn operator_len(s: &str) -> usize {
	let mut len = 0;
	for (i, ch) in s.char_indices() {
		if !is_operator_char(ch) {
			break;
		}
		if i > 0 && (s[i..].starts_with("//") || s[i..].starts_with("/*")) {
			break;
		}
		len = i + ch.len_utf8();
	}
	len
}

fn lex_number(s: &str) -> (NumberKind, usize) {
	let b = s.as_bytes();
	let len = b.len();
	let digits_from = |mut i: usize| {
		while i < len && b[i].is_ascii_digit() {
			i += 1;
		}
		i
	};

	if len >= 3 && b[0] == b'0' && (b[1] | 0x20) == b'x' && b[2].is_ascii_hexdigit() {
		let mut i = 2;
		while i < len && b[i].is_ascii_hexdigit() {
			i += 1;
		}
		if i < len && (b[i] | 0x20) == b'u' {
			i += 1;
		}
		return (NumberKind::Hex, i);
	}

	let mut i = digits_from(0);
	let int_end = i;
	let mut float = false;

	if i < len && b[i] == b'.' {
		float = true;
		i = digits_from(i + 1);
	}

	if i < len && (b[i] | 0x20) == b'e' {
		let mut j = i + 1;
		if j < len && (b[j] == b'+' || b[j] == b'-') {
			j += 1;
		}
		if j < len && b[j].is_ascii_digit() {
			i = digits_from(j);
			float = true;
		}
	}

	let suffix = float_suffix_len(&s[i..]);
	if float || suffix > 0 {
		return (NumberKind::Float, i + suffix);
	}

	if i < len && (b[i] | 0x20) == b'u' {
		i += 1;
	}

	let octal = int_end > 1 && b[0] == b'0' && b[1..int_end].iter().all(|d| (b'0'..=b'7').contains(d));
	let kind = if octal {
		NumberKind::Octal
	} else {
		NumberKind::Decimal
	};
	(kind, i)
}

/// Length of a `f`/`F` or `lf`/`LF` suffix at the start of `rest`.
fn float_suffix_len(rest: &str) -> usize {
	if rest.starts_with("lf") || rest.starts_with("LF") {
		2
	} else if rest.starts_with(['f', 'F']) {
		1
	} else {
		0
	}
}

/// Parses a literal token's text into its numeric value.
///
/// The type suffix is stripped first. Integer literals in hex or octal are
/// read in their radix.
pub fn literal_value(text: &str, kind: NumberKind) -> Option<f64> {
	match kind {
		NumberKind::Float => {
			let digits = text
				.strip_suffix("lf")
				.or_else(|| text.strip_suffix("LF"))
				.or_else(|| text.strip_suffix(['f', 'F']))
				.unwrap_or(text);
			digits.parse().ok()
		}
		NumberKind::Decimal => strip_unsigned(text).parse().ok(),
		NumberKind::Octal => u64::from_str_radix(&strip_unsigned(text)[1..], 8)
			.ok()
			.map(|v| v as f64),
		NumberKind::Hex => u64::from_str_radix(&strip_unsigned(text)[2..], 16)
			.ok()
			.map(|v| v as f64),
	}
}

fn strip_unsigned(text: &str) -> &str {
	text.strip_suffix(['u', 'U']).unwrap_or(text)
}
