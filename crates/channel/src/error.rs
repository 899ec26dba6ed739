use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::server::ChannelState;

/// Lifecycle failures of a [`LiveChannel`](crate::LiveChannel).
#[derive(Debug, Error)]
pub enum ChannelError {
	/// The listener could not bind its address.
	#[error("failed to bind live value channel on {addr}: {source}")]
	Bind {
		/// Requested address.
		addr: SocketAddr,
		/// Underlying I/O error.
		#[source]
		source: std::io::Error,
	},
	/// Binding did not finish in time.
	#[error("live value channel on {addr} did not start within {timeout:?}")]
	StartTimeout {
		/// Requested address.
		addr: SocketAddr,
		/// Configured start timeout.
		timeout: Duration,
	},
	/// Another start or stop is in progress.
	#[error("live value channel is {0:?}")]
	Transitioning(ChannelState),
}

/// A frame received from a peer could not be understood.
#[derive(Debug, Error)]
pub enum ProtocolError {
	/// Not a JSON object with a string `type`.
	#[error("invalid JSON frame: {0}")]
	InvalidJson(#[source] serde_json::Error),
	/// The `type` tag names no known message.
	#[error("unknown message type: {0}")]
	UnknownType(String),
	/// The `data` member does not fit the message type.
	#[error("invalid payload for {kind}: {source}")]
	InvalidPayload {
		/// The `type` tag.
		kind: String,
		/// Deserialization failure.
		#[source]
		source: serde_json::Error,
	},
}

impl ProtocolError {
	/// Code carried by the `error` frame sent back to the peer.
	pub fn code(&self) -> &'static str {
		match self {
			Self::InvalidJson(_) => "invalid_json",
			Self::UnknownType(_) => "unknown_type",
			Self::InvalidPayload { .. } => "invalid_payload",
		}
	}
}
