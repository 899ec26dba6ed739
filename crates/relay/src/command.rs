//! Line commands accepted on stdin during a nudge session.

use std::str::FromStr;

use glint_nudge::{NumberBoxAffordance, StepDirection};
use glint_primitives::Modifiers;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
	/// A bare number: set the live value.
	Set(f64),
	/// `up`/`down` followed by any of `ctrl`, `shift`, `alt`.
	Step(StepDirection, Modifiers),
	/// `drag F`: move the slider to fraction `F` of its track.
	Drag(f64),
	Commit,
	Cancel,
	Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
	#[error("empty command")]
	Empty,
	#[error("unknown modifier {0:?}; expected ctrl, shift or alt")]
	UnknownModifier(String),
	#[error("drag needs a fraction between 0 and 1")]
	MissingFraction,
	#[error("unknown command {0:?}")]
	Unknown(String),
}

impl FromStr for Command {
	type Err = CommandError;

	fn from_str(line: &str) -> Result<Self, Self::Err> {
		let mut words = line.split_whitespace();
		let Some(head) = words.next() else {
			return Err(CommandError::Empty);
		};
		match head.to_ascii_lowercase().as_str() {
			"up" => step(StepDirection::Up, words),
			"down" => step(StepDirection::Down, words),
			"drag" => words
				.next()
				.and_then(|w| w.parse().ok())
				.map(Self::Drag)
				.ok_or(CommandError::MissingFraction),
			"commit" | "confirm" => Ok(Self::Commit),
			"cancel" | "escape" => Ok(Self::Cancel),
			"toggle" | "trigger" => Ok(Self::Toggle),
			_ => NumberBoxAffordance::parse_input(line)
				.map(Self::Set)
				.ok_or_else(|| CommandError::Unknown(line.trim().to_string())),
		}
	}
}

fn step<'a>(direction: StepDirection, names: impl Iterator<Item = &'a str>) -> Result<Command, CommandError> {
	Modifiers::from_names(names)
		.map(|mods| Command::Step(direction, mods))
		.map_err(|name| CommandError::UnknownModifier(name.to_string()))
}
