use std::sync::Arc;

use glint_channel::LiveChannel;

/// Destination for live values while a session is open.
pub trait ValueSink: Send + Sync {
	/// Publishes `value` and returns how many receivers it reached.
	///
	/// Must not block and must not fail; zero receivers is a normal outcome.
	fn send_value(&self, value: f64) -> usize;
}

impl ValueSink for LiveChannel {
	fn send_value(&self, value: f64) -> usize {
		self.send_uniform_update(value)
	}
}

impl<S: ValueSink + ?Sized> ValueSink for Arc<S> {
	fn send_value(&self, value: f64) -> usize {
		(**self).send_value(value)
	}
}
