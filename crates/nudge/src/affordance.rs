//! Input affordances shown while a literal is being nudged.
//!
//! The state machine drives one [`Affordance`] and does not care whether the
//! user is dragging a slider or typing into a number box; both are headless
//! models a front end renders and feeds back into the machine.

use glint_placeholder::format_value;
use glint_primitives::TextRange;
use glint_scanner::parse_float_prefix;

/// Which input modality an affordance offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffordanceKind {
	Slider,
	NumberBox,
}

/// Headless UI model attached to the literal under edit.
pub trait Affordance {
	fn kind(&self) -> AffordanceKind;

	/// Shows the affordance next to `anchor`, initialised to `value`.
	fn open(&mut self, anchor: TextRange, value: f64);

	/// Reflects a value that changed elsewhere (stepping, typed input).
	fn show_value(&mut self, value: f64);

	fn close(&mut self);

	fn is_open(&self) -> bool;

	/// The literal range the affordance is attached to, while open.
	fn anchor(&self) -> Option<TextRange>;
}

impl<A: Affordance + ?Sized> Affordance for Box<A> {
	fn kind(&self) -> AffordanceKind {
		(**self).kind()
	}

	fn open(&mut self, anchor: TextRange, value: f64) {
		(**self).open(anchor, value);
	}

	fn show_value(&mut self, value: f64) {
		(**self).show_value(value);
	}

	fn close(&mut self) {
		(**self).close();
	}

	fn is_open(&self) -> bool {
		(**self).is_open()
	}

	fn anchor(&self) -> Option<TextRange> {
		(**self).anchor()
	}
}

/// Slider centred on the value it was opened with.
///
/// The track spans `max(|v|, 1)` on each side of the opening value `v`. A value
/// pushed outside the track (by stepping or typing) re-centres it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliderAffordance {
	anchor: Option<TextRange>,
	min: f64,
	max: f64,
	value: f64,
}

impl SliderAffordance {
	pub fn new() -> Self {
		Self::default()
	}

	/// Track bounds, while open.
	pub fn bounds(&self) -> Option<(f64, f64)> {
		self.anchor.map(|_| (self.min, self.max))
	}

	pub fn value(&self) -> f64 {
		self.value
	}

	/// Maps a drag position (0 at the left end, 1 at the right) to a value.
	///
	/// Positions outside `0..=1` are clamped. Returns `None` while closed.
	pub fn value_at(&self, fraction: f64) -> Option<f64> {
		self.anchor?;
		let fraction = if fraction.is_nan() { 0.5 } else { fraction.clamp(0.0, 1.0) };
		Some(self.min + (self.max - self.min) * fraction)
	}

	/// Position of the current value along the track.
	pub fn fraction(&self) -> Option<f64> {
		self.anchor?;
		Some((self.value - self.min) / (self.max - self.min))
	}

	fn centre_on(&mut self, value: f64) {
		let span = value.abs().max(1.0);
		self.min = value - span;
		self.max = value + span;
	}
}

impl Affordance for SliderAffordance {
	fn kind(&self) -> AffordanceKind {
		AffordanceKind::Slider
	}

	fn open(&mut self, anchor: TextRange, value: f64) {
		self.anchor = Some(anchor);
		self.value = value;
		self.centre_on(value);
	}

	fn show_value(&mut self, value: f64) {
		self.value = value;
		if value < self.min || value > self.max {
			self.centre_on(value);
		}
	}

	fn close(&mut self) {
		self.anchor = None;
	}

	fn is_open(&self) -> bool {
		self.anchor.is_some()
	}

	fn anchor(&self) -> Option<TextRange> {
		self.anchor
	}
}

/// Text box holding the number as the user sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberBoxAffordance {
	anchor: Option<TextRange>,
	text: String,
}

impl NumberBoxAffordance {
	pub fn new() -> Self {
		Self::default()
	}

	/// Displayed text.
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Parses typed input leniently: surrounding whitespace and trailing
	/// junk are ignored, so `" 2.5f"` reads as `2.5`. Non-finite results are
	/// rejected.
	pub fn parse_input(text: &str) -> Option<f64> {
		parse_float_prefix(text).filter(|v| v.is_finite())
	}
}

impl Affordance for NumberBoxAffordance {
	fn kind(&self) -> AffordanceKind {
		AffordanceKind::NumberBox
	}

	fn open(&mut self, anchor: TextRange, value: f64) {
		self.anchor = Some(anchor);
		self.text = format_value(value, None);
	}

	fn show_value(&mut self, value: f64) {
		self.text = format_value(value, None);
	}

	fn close(&mut self) {
		self.anchor = None;
		self.text.clear();
	}

	fn is_open(&self) -> bool {
		self.anchor.is_some()
	}

	fn anchor(&self) -> Option<TextRange> {
		self.anchor
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn anchor() -> TextRange {
		TextRange::on_line(3, 9, 4)
	}

	#[test]
	fn slider_centres_on_open_value() {
		let mut slider = SliderAffordance::new();
		assert_eq!(slider.value_at(0.5), None);

		slider.open(anchor(), 4.0);
		assert_eq!(slider.bounds(), Some((0.0, 8.0)));
		assert_eq!(slider.value_at(0.0), Some(0.0));
		assert_eq!(slider.value_at(0.25), Some(2.0));
		assert_eq!(slider.value_at(7.0), Some(8.0));
		assert_eq!(slider.fraction(), Some(0.5));

		slider.open(anchor(), 0.5);
		assert_eq!(slider.bounds(), Some((-0.5, 1.5)));
	}

	#[test]
	fn slider_recentres_when_value_leaves_track() {
		let mut slider = SliderAffordance::new();
		slider.open(anchor(), 1.0);
		slider.show_value(1.5);
		assert_eq!(slider.bounds(), Some((0.0, 2.0)));
		slider.show_value(-3.0);
		assert_eq!(slider.bounds(), Some((-6.0, 0.0)));
		slider.close();
		assert!(!slider.is_open());
		assert_eq!(slider.anchor(), None);
	}

	#[test]
	fn number_box_tracks_text() {
		let mut boxed = NumberBoxAffordance::new();
		boxed.open(anchor(), 1.0);
		assert_eq!(boxed.text(), "1");
		assert_eq!(boxed.anchor(), Some(anchor()));
		boxed.show_value(-0.25);
		assert_eq!(boxed.text(), "-0.25");
		boxed.close();
		assert_eq!(boxed.text(), "");
	}

	#[test]
	fn number_box_parses_leniently() {
		assert_eq!(NumberBoxAffordance::parse_input(" 2.5f"), Some(2.5));
		assert_eq!(NumberBoxAffordance::parse_input("-1e2"), Some(-100.0));
		assert_eq!(NumberBoxAffordance::parse_input("abc"), None);
		assert_eq!(NumberBoxAffordance::parse_input("1e400"), None);
	}

	#[test]
	fn boxed_strategy_delegates() {
		let mut strategy: Box<dyn Affordance> = Box::new(SliderAffordance::new());
		assert_eq!(strategy.kind(), AffordanceKind::Slider);
		strategy.open(anchor(), 2.0);
		assert!(strategy.is_open());
	}
}
