use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use glint_placeholder::Placeholder;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// `[channel]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelSettings {
	/// Interface to bind; an IP address or `localhost`.
	pub host: String,
	/// TCP port; 0 picks a free one.
	pub port: u16,
	/// Bound on binding the listener.
	pub start_timeout_ms: u64,
	/// Bound on shutting the listener down.
	pub stop_timeout_ms: u64,
}

impl Default for ChannelSettings {
	fn default() -> Self {
		Self {
			host: "127.0.0.1".to_string(),
			port: 8765,
			start_timeout_ms: 5000,
			stop_timeout_ms: 5000,
		}
	}
}

impl ChannelSettings {
	/// The address to bind.
	pub fn socket_addr(&self) -> Result<SocketAddr> {
		let ip = if self.host.eq_ignore_ascii_case("localhost") {
			IpAddr::V4(Ipv4Addr::LOCALHOST)
		} else {
			self.host.parse().map_err(|_| ConfigError::Invalid {
				field: "channel.host",
				reason: format!("{:?} is not an IP address", self.host),
			})?
		};
		Ok(SocketAddr::new(ip, self.port))
	}

	pub fn start_timeout(&self) -> Duration {
		Duration::from_millis(self.start_timeout_ms)
	}

	pub fn stop_timeout(&self) -> Duration {
		Duration::from_millis(self.stop_timeout_ms)
	}

	pub(crate) fn validate(&self) -> Result<()> {
		self.socket_addr()?;
		if self.start_timeout_ms == 0 {
			return Err(ConfigError::Invalid {
				field: "channel.start_timeout_ms",
				reason: "must be positive".into(),
			});
		}
		if self.stop_timeout_ms == 0 {
			return Err(ConfigError::Invalid {
				field: "channel.stop_timeout_ms",
				reason: "must be positive".into(),
			});
		}
		Ok(())
	}
}

/// `[nudge]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NudgeSettings {
	/// Uniform name written in place of the literal.
	pub placeholder: String,
	/// Step sizes, coarsest first; each held modifier moves one rung down.
	pub step_ladder: Vec<f64>,
	/// Save the document when a session commits or cancels.
	pub save_on_finish: bool,
}

impl Default for NudgeSettings {
	fn default() -> Self {
		Self {
			placeholder: "u_inline1f".to_string(),
			step_ladder: vec![1.0, 0.1, 0.01, 0.001],
			save_on_finish: true,
		}
	}
}

impl NudgeSettings {
	pub(crate) fn validate(&self) -> Result<()> {
		let invalid = |field, reason: &str| {
			Err(ConfigError::Invalid {
				field,
				reason: reason.to_string(),
			})
		};
		if let Err(e) = Placeholder::new(self.placeholder.as_str()) {
			return invalid("nudge.placeholder", &e.to_string());
		}
		if self.step_ladder.is_empty() {
			return invalid("nudge.step_ladder", "must not be empty");
		}
		if self.step_ladder.iter().any(|s| !s.is_finite() || *s <= 0.0) {
			return invalid("nudge.step_ladder", "steps must be finite and positive");
		}
		if self.step_ladder.windows(2).any(|w| w[1] >= w[0]) {
			return invalid("nudge.step_ladder", "steps must be strictly decreasing");
		}
		Ok(())
	}
}
