//! Live value channel.
//!
//! A loopback WebSocket server that renderers connect to. While a literal is
//! being nudged the editor pushes every intermediate value through
//! [`LiveChannel::send_uniform_update`], and each connected renderer writes it
//! into the placeholder uniform without recompiling the shader.
//!
//! Frames are JSON text, see [`protocol`]. On connect a renderer receives a
//! `ping`; it may `ping` back at any time and gets a `pong`. Frames the server
//! cannot handle are answered with an `error` frame and the connection stays
//! open.

pub mod error;
mod peer;
pub mod protocol;
mod server;

pub use error::{ChannelError, ProtocolError};
pub use protocol::{ErrorReport, Liveness, UniformUpdate, WireMessage};
pub use server::{
	ChannelConfig, ChannelEvent, ChannelState, ConnectionStatus, DEFAULT_PORT, DEFAULT_TIMEOUT, LiveChannel, PeerId,
};
