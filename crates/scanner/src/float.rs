/// Parses the longest numeric prefix of `text`.
///
/// Leading whitespace and an optional sign are accepted; anything after the
/// number is ignored. `"  -2.5f;"` parses as `-2.5`, `"x1"` does not parse.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
	let text = text.trim_start();
	let b = text.as_bytes();
	let digits_from = |mut i: usize| {
		while i < b.len() && b[i].is_ascii_digit() {
			i += 1;
		}
		i
	};

	let mut i = usize::from(matches!(b.first(), Some(b'+' | b'-')));
	let int_start = i;
	i = digits_from(i);
	let mut mantissa_digits = i - int_start;

	if b.get(i) == Some(&b'.') {
		let frac_start = i + 1;
		let frac_end = digits_from(frac_start);
		mantissa_digits += frac_end - frac_start;
		if mantissa_digits > 0 {
			i = frac_end;
		}
	}
	if mantissa_digits == 0 {
		return None;
	}

	if matches!(b.get(i), Some(b'e' | b'E')) {
		let mut j = i + 1;
		if matches!(b.get(j), Some(b'+' | b'-')) {
			j += 1;
		}
		let exp_end = digits_from(j);
		if exp_end > j {
			i = exp_end;
		}
	}

	text[..i].parse().ok()
}

#[cfg(test)]
mod tests {
	use super::parse_float_prefix;

	#[test]
	fn parses_clean_numbers() {
		assert_eq!(parse_float_prefix("1.0"), Some(1.0));
		assert_eq!(parse_float_prefix("-2.5"), Some(-2.5));
		assert_eq!(parse_float_prefix("+.5"), Some(0.5));
		assert_eq!(parse_float_prefix("3."), Some(3.0));
		assert_eq!(parse_float_prefix("1e3"), Some(1000.0));
	}

	#[test]
	fn ignores_surrounding_text() {
		assert_eq!(parse_float_prefix("  1.0f"), Some(1.0));
		assert_eq!(parse_float_prefix("0.25) * k"), Some(0.25));
		assert_eq!(parse_float_prefix("4e+x"), Some(4.0));
	}

	#[test]
	fn rejects_non_numbers() {
		assert_eq!(parse_float_prefix(""), None);
		assert_eq!(parse_float_prefix("-"), None);
		assert_eq!(parse_float_prefix("."), None);
		assert_eq!(parse_float_prefix("x1"), None);
		assert_eq!(parse_float_prefix("= 2.0"), None);
	}
}
