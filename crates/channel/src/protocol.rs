//! JSON wire protocol spoken with renderer peers.
//!
//! Every WebSocket text frame carries exactly one object of the form
//! `{ "type": <kind>, "data": { ... } }`.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;

/// Payload of an `update_uniform` frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformUpdate {
	/// New value of the live uniform.
	pub value: f64,
}

/// Payload of `ping` and `pong` frames.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Liveness {
	/// Free-form note.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	/// Milliseconds since the Unix epoch.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timestamp: Option<f64>,
}

/// Payload of an `error` frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
	/// Human-readable description.
	pub message: String,
	/// Machine-readable code.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code: Option<String>,
}

/// A frame of the live value protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum WireMessage {
	/// New value for the placeholder uniform.
	UpdateUniform(UniformUpdate),
	/// Liveness ping.
	Ping(Liveness),
	/// Answer to a liveness ping.
	Pong(Liveness),
	/// A frame could not be handled.
	Error(ErrorReport),
}

#[derive(Deserialize)]
struct RawFrame {
	#[serde(rename = "type")]
	kind: String,
	#[serde(default)]
	data: Value,
}

impl WireMessage {
	/// Builds an `update_uniform` frame.
	pub fn update_uniform(value: f64) -> Self {
		Self::UpdateUniform(UniformUpdate { value })
	}

	/// Builds the ping sent to a peer when it connects.
	pub fn hello() -> Self {
		Self::Ping(Liveness {
			message: Some("hello".to_string()),
			timestamp: Some(now_millis()),
		})
	}

	/// Builds the answer to `ping`, echoing its timestamp when present.
	pub fn pong_for(ping: &Liveness) -> Self {
		Self::Pong(Liveness {
			message: Some("pong".to_string()),
			timestamp: ping.timestamp.or_else(|| Some(now_millis())),
		})
	}

	/// Builds an `error` frame.
	pub fn error(message: impl Into<String>, code: Option<&str>) -> Self {
		Self::Error(ErrorReport {
			message: message.into(),
			code: code.map(str::to_string),
		})
	}

	/// The `type` tag of this frame.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::UpdateUniform(_) => "update_uniform",
			Self::Ping(_) => "ping",
			Self::Pong(_) => "pong",
			Self::Error(_) => "error",
		}
	}

	/// Serializes the frame to JSON text.
	pub fn encode(&self) -> Result<String, ProtocolError> {
		serde_json::to_string(self).map_err(ProtocolError::InvalidJson)
	}

	/// Parses one frame.
	///
	/// A missing or `null` `data` member is read as an empty object, so a bare
	/// `{"type":"ping"}` is accepted.
	pub fn decode(text: &str) -> Result<Self, ProtocolError> {
		let raw: RawFrame = serde_json::from_str(text).map_err(ProtocolError::InvalidJson)?;
		let data = if raw.data.is_null() {
			Value::Object(Default::default())
		} else {
			raw.data
		};

		let parsed = match raw.kind.as_str() {
			"update_uniform" => serde_json::from_value(data).map(Self::UpdateUniform),
			"ping" => serde_json::from_value(data).map(Self::Ping),
			"pong" => serde_json::from_value(data).map(Self::Pong),
			"error" => serde_json::from_value(data).map(Self::Error),
			_ => return Err(ProtocolError::UnknownType(raw.kind.clone())),
		};
		parsed.map_err(|source| ProtocolError::InvalidPayload {
			kind: raw.kind,
			source,
		})
	}
}

/// Milliseconds since the Unix epoch, as the renderer's scripting side reports time.
pub fn now_millis() -> f64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map_or(0.0, |d| d.as_secs_f64() * 1000.0)
}
