//! Discrete stepping with a modifier-selected step size.

use glint_primitives::Modifiers;
use thiserror::Error;

/// Which way a step moves the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
	Up,
	Down,
}

impl StepDirection {
	fn sign(self) -> f64 {
		match self {
			Self::Up => 1.0,
			Self::Down => -1.0,
		}
	}
}

/// The ladder has no steps, or a step is not finite, positive and smaller than the one before.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid step ladder {0:?}: steps must be finite, positive and strictly decreasing")]
pub struct InvalidLadder(pub Vec<f64>);

/// Step sizes ordered coarse to fine.
///
/// No modifier selects the first rung; each held modifier moves one rung
/// finer, stopping at the last.
#[derive(Debug, Clone, PartialEq)]
pub struct StepLadder {
	steps: Vec<f64>,
}

impl Default for StepLadder {
	fn default() -> Self {
		Self {
			steps: vec![1.0, 0.1, 0.01, 0.001],
		}
	}
}

impl StepLadder {
	pub fn new(steps: Vec<f64>) -> Result<Self, InvalidLadder> {
		let valid = !steps.is_empty()
			&& steps.iter().all(|s| s.is_finite() && *s > 0.0)
			&& steps.windows(2).all(|w| w[1] < w[0]);
		if !valid {
			return Err(InvalidLadder(steps));
		}
		Ok(Self { steps })
	}

	pub fn steps(&self) -> &[f64] {
		&self.steps
	}

	/// The step size selected by `modifiers`.
	pub fn step_for(&self, modifiers: Modifiers) -> f64 {
		let rung = modifiers.held().min(self.steps.len() - 1);
		self.steps[rung]
	}

	/// Moves `value` one step and rounds to the step's decimal precision.
	///
	/// Rounding keeps repeated steps from accumulating float noise: stepping
	/// `0.2` up by `0.1` yields `0.3`, not `0.30000000000000004`.
	pub fn apply(&self, value: f64, direction: StepDirection, modifiers: Modifiers) -> f64 {
		let step = self.step_for(modifiers);
		round_to(value + direction.sign() * step, decimals_of(step))
	}
}

/// Number of fractional digits in the shortest decimal form of `step`.
pub fn decimals_of(step: f64) -> u32 {
	let text = step.to_string();
	text.split_once('.')
		.map_or(0, |(_, frac)| frac.len() as u32)
		.min(15)
}

/// Rounds half away from zero to `decimals` fractional digits.
pub fn round_to(value: f64, decimals: u32) -> f64 {
	let factor = 10f64.powi(decimals as i32);
	let rounded = (value * factor).round() / factor;
	if rounded == 0.0 { 0.0 } else { rounded }
}
