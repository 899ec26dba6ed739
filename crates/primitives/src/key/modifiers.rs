//! Modifier keys held during a stepping gesture.

/// Key modifiers (Ctrl, Alt, Shift).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
	/// Whether Ctrl is held.
	pub ctrl: bool,
	/// Whether Alt is held.
	pub alt: bool,
	/// Whether Shift is held.
	pub shift: bool,
}

impl Modifiers {
	/// No modifiers pressed.
	pub const NONE: Self = Self {
		ctrl: false,
		alt: false,
		shift: false,
	};

	/// Only Ctrl pressed.
	pub const CTRL: Self = Self {
		ctrl: true,
		alt: false,
		shift: false,
	};

	/// Only Alt pressed.
	pub const ALT: Self = Self {
		ctrl: false,
		alt: true,
		shift: false,
	};

	/// Only Shift pressed.
	pub const SHIFT: Self = Self {
		ctrl: false,
		alt: false,
		shift: true,
	};

	/// Returns a copy with Ctrl added.
	pub fn ctrl(self) -> Self {
		Self { ctrl: true, ..self }
	}

	/// Returns a copy with Alt added.
	pub fn alt(self) -> Self {
		Self { alt: true, ..self }
	}

	/// Returns a copy with Shift added.
	pub fn shift(self) -> Self {
		Self { shift: true, ..self }
	}

	/// Number of modifiers held.
	///
	/// Ctrl, Alt and Shift weigh the same; `Ctrl+Shift` and `Alt+Shift` both
	/// count as two.
	pub fn held(self) -> usize {
		usize::from(self.ctrl) + usize::from(self.alt) + usize::from(self.shift)
	}

	/// Parses modifier names (`ctrl`, `alt`, `shift`, case-insensitive).
	///
	/// Unknown names are returned as the error value.
	pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Self, &'a str> {
		let mut mods = Self::NONE;
		for name in names {
			mods = match name.to_ascii_lowercase().as_str() {
				"ctrl" | "control" => mods.ctrl(),
				"alt" | "option" => mods.alt(),
				"shift" => mods.shift(),
				_ => return Err(name),
			};
		}
		Ok(mods)
	}
}
