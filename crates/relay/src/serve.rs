use glint_channel::{ChannelEvent, LiveChannel};
use glint_nudge::NumberBoxAffordance;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

/// Serves until stdin closes or Ctrl-C, broadcasting each number read.
pub async fn run(channel: LiveChannel) -> anyhow::Result<()> {
	let addr = channel.start().await?;
	tracing::info!(url = %format!("ws://{addr}"), "Waiting for renderers; type numbers to broadcast");

	let mut events = channel.subscribe();
	let presence = tokio::spawn(async move {
		loop {
			match events.recv().await {
				Ok(ChannelEvent::Connected) => tracing::info!("Renderer attached"),
				Ok(ChannelEvent::Disconnected) => tracing::info!("No renderer attached"),
				Err(RecvError::Lagged(skipped)) => tracing::debug!(skipped, "Presence events lagged"),
				Err(RecvError::Closed) => break,
			}
		}
	});

	let mut lines = BufReader::new(tokio::io::stdin()).lines();
	loop {
		tokio::select! {
			line = lines.next_line() => {
				let Some(line) = line? else { break };
				let input = line.trim();
				if input.is_empty() {
					continue;
				}
				match NumberBoxAffordance::parse_input(input) {
					Some(value) => {
						let reached = channel.send_uniform_update(value);
						tracing::info!(value, reached, "Sent uniform update");
					}
					None => tracing::warn!(%input, "Not a number"),
				}
			}
			_ = tokio::signal::ctrl_c() => break,
		}
	}

	channel.stop().await;
	presence.abort();
	Ok(())
}

