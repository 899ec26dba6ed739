//! Configuration for glint.
//!
//! Settings are written in TOML and grouped in two tables:
//!
//! ```toml
//! [channel]
//! host = "127.0.0.1"
//! port = 8765
//! start_timeout_ms = 5000
//! stop_timeout_ms = 5000
//!
//! [nudge]
//! placeholder = "u_inline1f"
//! step_ladder = [1.0, 0.1, 0.01, 0.001]
//! save_on_finish = true
//! ```
//!
//! Every key is optional; missing keys take the defaults shown. Unknown keys
//! are errors so typos do not go unnoticed.
//!
//! # Configuration Files
//!
//! The file is looked up in this order:
//!
//! 1. An explicit path (the `--config` flag).
//! 2. The `GLINT_CONFIG` environment variable.
//! 3. `$XDG_CONFIG_HOME/glint/config.toml` (or the platform equivalent).
//!
//! Only an explicit path must exist; otherwise a missing file means defaults.

pub mod error;
mod settings;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

pub use error::{ConfigError, Result};
pub use settings::{ChannelSettings, NudgeSettings};
use serde::{Deserialize, Serialize};

/// Parsed configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Live value channel settings.
	pub channel: ChannelSettings,
	/// Nudge session settings.
	pub nudge: NudgeSettings,
}

impl Config {
	/// Parse and validate a TOML string.
	pub fn parse(input: &str) -> Result<Self> {
		let config: Config = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Load configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		let config = Self::parse(&content)?;
		tracing::debug!(path = %path.display(), "Loaded configuration");
		Ok(config)
	}

	/// Load from `explicit` if given, else from [`default_config_path`] if
	/// that file exists, else return defaults.
	pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
		if let Some(path) = explicit {
			return Self::load(path);
		}
		match default_config_path() {
			Some(path) if path.is_file() => Self::load(path),
			_ => Ok(Self::default()),
		}
	}

	/// Checks value ranges the type system cannot express.
	pub fn validate(&self) -> Result<()> {
		self.channel.validate()?;
		self.nudge.validate()
	}
}

/// Returns the configuration file path used when none is given explicitly.
///
/// # Resolution Order
///
/// 1. `GLINT_CONFIG` environment variable.
/// 2. `glint/config.toml` under the user configuration directory.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
	if let Ok(p) = std::env::var("GLINT_CONFIG") {
		return Some(PathBuf::from(p));
	}
	dirs::config_dir().map(|dir| dir.join("glint").join("config.toml"))
}
