//! Per-connection task: handshake, reader loop and outbound writer.

use std::net::SocketAddr;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::protocol::WireMessage;
use crate::server::{PeerId, Shared};

pub(crate) async fn serve(shared: Arc<Shared>, stream: TcpStream, addr: SocketAddr, cancel: CancellationToken) {
	let ws = tokio::select! {
		_ = cancel.cancelled() => return,
		res = tokio_tungstenite::accept_async(stream) => match res {
			Ok(ws) => ws,
			Err(e) => {
				tracing::warn!(%addr, error = %e, "WebSocket handshake failed");
				return;
			}
		},
	};
	if cancel.is_cancelled() {
		return;
	}

	let (mut sink, mut incoming) = ws.split();
	let (outbound, mut queue) = mpsc::unbounded_channel::<Message>();
	let id = shared.register(addr, outbound.clone());
	send(&outbound, &WireMessage::hello());

	// Drains until every sender is gone: ours below, and the registry's on
	// unregister. Stop cancels instead, dropping the backlog and the socket.
	let writer_cancel = cancel.clone();
	tokio::spawn(async move {
		tokio::select! {
			biased;
			_ = writer_cancel.cancelled() => {
				tracing::debug!(peer = %id, "Dropping renderer connection and its backlog");
			}
			_ = async {
				while let Some(frame) = queue.recv().await {
					if let Err(e) = sink.send(frame).await {
						tracing::debug!(peer = %id, error = %e, "Renderer write failed");
						return;
					}
				}
				let _ = sink.close().await;
			} => {}
		}
	});

	loop {
		tokio::select! {
			_ = cancel.cancelled() => break,
			frame = incoming.next() => match frame {
				Some(Ok(Message::Text(text))) => {
					if let Some(reply) = respond(id, text.as_str()) {
						send(&outbound, &reply);
					}
				}
				Some(Ok(Message::Binary(_))) => {
					send(&outbound, &WireMessage::error("binary frames are not supported", Some("unsupported_frame")));
				}
				Some(Ok(Message::Close(_))) | None => break,
				Some(Ok(_)) => {}
				Some(Err(e)) => {
					tracing::debug!(peer = %id, error = %e, "Renderer read failed");
					break;
				}
			}
		}
	}

	drop(outbound);
	shared.unregister(id);
}

/// Handles one text frame and returns the reply, if any.
pub(crate) fn respond(id: PeerId, text: &str) -> Option<WireMessage> {
	match WireMessage::decode(text) {
		Ok(WireMessage::Ping(ping)) => Some(WireMessage::pong_for(&ping)),
		Ok(WireMessage::Pong(pong)) => {
			tracing::trace!(peer = %id, timestamp = ?pong.timestamp, "Renderer pong");
			None
		}
		Ok(WireMessage::Error(report)) => {
			tracing::warn!(peer = %id, code = ?report.code, message = %report.message, "Renderer reported error");
			None
		}
		Ok(WireMessage::UpdateUniform(update)) => {
			tracing::debug!(peer = %id, value = update.value, "Ignoring uniform update from renderer");
			None
		}
		Err(e) => {
			tracing::debug!(peer = %id, error = %e, "Rejected renderer frame");
			Some(WireMessage::error(e.to_string(), Some(e.code())))
		}
	}
}

fn send(outbound: &mpsc::UnboundedSender<Message>, message: &WireMessage) {
	match message.encode() {
		Ok(text) => {
			let _ = outbound.send(Message::text(text));
		}
		Err(e) => tracing::warn!(error = %e, kind = message.kind(), "Failed to encode frame"),
	}
}
