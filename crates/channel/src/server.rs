//! Channel lifecycle, peer registry and broadcast.

use std::collections::HashMap;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::error::ChannelError;
use crate::peer;
use crate::protocol::WireMessage;


/// Port the renderer connects to unless configured otherwise.
pub const DEFAULT_PORT: u16 = 8765;

/// Default bound on how long start and stop may take.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Listener settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
	/// Address to bind. Loopback on [`DEFAULT_PORT`] by default.
	pub addr: SocketAddr,
	/// Bound on binding the listener.
	pub start_timeout: Duration,
	/// Bound on draining the accept task during stop.
	pub stop_timeout: Duration,
}

impl Default for ChannelConfig {
	fn default() -> Self {
		Self {
			addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
			start_timeout: DEFAULT_TIMEOUT,
			stop_timeout: DEFAULT_TIMEOUT,
		}
	}
}

impl ChannelConfig {
	/// Default settings bound to `addr`.
	pub fn with_addr(addr: SocketAddr) -> Self {
		Self {
			addr,
			..Self::default()
		}
	}
}

/// Lifecycle state of the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
	Stopped,
	Starting,
	Running,
	Stopping,
}

/// Renderer presence changes.
///
/// `Connected` fires when the first peer arrives and `Disconnected` when the
/// last one leaves; peers joining or leaving in between are silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelEvent {
	Connected,
	Disconnected,
}

/// Snapshot returned by [`LiveChannel::connection_status`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionStatus {
	/// True while the listener is accepting.
	pub is_running: bool,
	/// Number of handshaken peers.
	pub client_count: usize,
}

/// Identifier of a connected peer, unique for the life of the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub u64);

impl std::fmt::Display for PeerId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "peer-{}", self.0)
	}
}

struct Peer {
	outbound: mpsc::UnboundedSender<Message>,
	addr: SocketAddr,
	connected_at: Instant,
}

struct Listener {
	local_addr: SocketAddr,
	shutdown: CancellationToken,
	accept: JoinHandle<()>,
}

struct Lifecycle {
	state: ChannelState,
	listener: Option<Listener>,
}

pub(crate) struct Shared {
	config: ChannelConfig,
	lifecycle: Mutex<Lifecycle>,
	peers: Mutex<HashMap<PeerId, Peer>>,
	next_peer: AtomicU64,
	events: broadcast::Sender<ChannelEvent>,
}

impl Shared {
	// Presence edges are sent while `peers` is locked so their order always
	// matches the order in which the set changed.

	pub(crate) fn register(&self, addr: SocketAddr, outbound: mpsc::UnboundedSender<Message>) -> PeerId {
		let id = PeerId(self.next_peer.fetch_add(1, Ordering::Relaxed));
		let mut peers = self.peers.lock();
		peers.insert(
			id,
			Peer {
				outbound,
				addr,
				connected_at: Instant::now(),
			},
		);
		if peers.len() == 1 {
			let _ = self.events.send(ChannelEvent::Connected);
		}
		drop(peers);
		tracing::info!(peer = %id, %addr, "Renderer connected");
		id
	}

	pub(crate) fn unregister(&self, id: PeerId) {
		let mut peers = self.peers.lock();
		let Some(peer) = peers.remove(&id) else {
			return;
		};
		if peers.is_empty() {
			let _ = self.events.send(ChannelEvent::Disconnected);
		}
		drop(peers);
		tracing::info!(
			peer = %id,
			addr = %peer.addr,
			connected_for = ?peer.connected_at.elapsed(),
			"Renderer disconnected"
		);
	}

	/// Forgets every peer. Their tasks are closed through the shutdown token.
	fn drop_all_peers(&self) {
		let drained: Vec<(PeerId, Peer)> = {
			let mut peers = self.peers.lock();
			let drained: Vec<_> = peers.drain().collect();
			if !drained.is_empty() {
				let _ = self.events.send(ChannelEvent::Disconnected);
			}
			drained
		};
		for (id, peer) in &drained {
			tracing::debug!(peer = %id, addr = %peer.addr, "Closing renderer connection");
		}
	}
}

/// Loopback WebSocket server that pushes live uniform values to renderers.
///
/// Cloning yields another handle to the same channel.
#[derive(Clone)]
pub struct LiveChannel {
	shared: Arc<Shared>,
}

impl std::fmt::Debug for LiveChannel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LiveChannel")
			.field("addr", &self.shared.config.addr)
			.field("state", &self.state())
			.field("clients", &self.shared.peers.lock().len())
			.finish()
	}
}

impl Default for LiveChannel {
	fn default() -> Self {
		Self::new(ChannelConfig::default())
	}
}

impl LiveChannel {
	/// Creates a stopped channel.
	pub fn new(config: ChannelConfig) -> Self {
		let (events, _) = broadcast::channel(16);
		Self {
			shared: Arc::new(Shared {
				config,
				lifecycle: Mutex::new(Lifecycle {
					state: ChannelState::Stopped,
					listener: None,
				}),
				peers: Mutex::new(HashMap::new()),
				next_peer: AtomicU64::new(1),
				events,
			}),
		}
	}

	/// Settings this channel was created with.
	pub fn config(&self) -> &ChannelConfig {
		&self.shared.config
	}

	/// Binds the listener and starts accepting renderers.
	///
	/// Calling this while already running returns the bound address without
	/// rebinding. A failed or timed-out bind leaves the channel stopped.
	///
	/// # Errors
	///
	/// Returns [`ChannelError::Transitioning`] if a start or stop is in flight,
	/// [`ChannelError::Bind`] if the address is unavailable, and
	/// [`ChannelError::StartTimeout`] if binding exceeds the start timeout.
	pub async fn start(&self) -> Result<SocketAddr, ChannelError> {
		self.start_with(TcpListener::bind(self.shared.config.addr)).await
	}

	/// [`start`](Self::start) with the bind step supplied by the caller.
	async fn start_with<F>(&self, bind: F) -> Result<SocketAddr, ChannelError>
	where
		F: Future<Output = io::Result<TcpListener>>,
	{
		{
			let mut lifecycle = self.shared.lifecycle.lock();
			match (lifecycle.state, &lifecycle.listener) {
				(ChannelState::Running, Some(listener)) => return Ok(listener.local_addr),
				(ChannelState::Stopped, _) => lifecycle.state = ChannelState::Starting,
				(state, _) => return Err(ChannelError::Transitioning(state)),
			}
		}

		let addr = self.shared.config.addr;
		let timeout = self.shared.config.start_timeout;
		let bound = match tokio::time::timeout(timeout, bind).await {
			Ok(bound) => bound.and_then(|listener| {
				let local_addr = listener.local_addr()?;
				Ok((listener, local_addr))
			}),
			Err(_) => {
				self.set_state(ChannelState::Stopped);
				tracing::warn!(%addr, ?timeout, "Live value channel start timed out");
				return Err(ChannelError::StartTimeout { addr, timeout });
			}
		};
		let (listener, local_addr) = match bound {
			Ok(bound) => bound,
			Err(source) => {
				self.set_state(ChannelState::Stopped);
				tracing::warn!(%addr, error = %source, "Live value channel failed to bind");
				return Err(ChannelError::Bind { addr, source });
			}
		};

		let shutdown = CancellationToken::new();
		let accept = tokio::spawn(accept_loop(self.shared.clone(), listener, shutdown.clone()));
		{
			let mut lifecycle = self.shared.lifecycle.lock();
			lifecycle.state = ChannelState::Running;
			lifecycle.listener = Some(Listener {
				local_addr,
				shutdown,
				accept,
			});
		}
		tracing::info!(%local_addr, "Live value channel listening");
		Ok(local_addr)
	}

	/// Stops accepting, closes every peer and releases the port.
	///
	/// Does nothing unless the channel is running. If the accept task does not
	/// wind down within the stop timeout it is aborted.
	pub async fn stop(&self) {
		let listener = {
			let mut lifecycle = self.shared.lifecycle.lock();
			if lifecycle.state != ChannelState::Running {
				return;
			}
			lifecycle.state = ChannelState::Stopping;
			lifecycle.listener.take()
		};

		if let Some(listener) = listener {
			listener.shutdown.cancel();
			self.shared.drop_all_peers();
			let timeout = self.shared.config.stop_timeout;
			let mut accept = listener.accept;
			if tokio::time::timeout(timeout, &mut accept).await.is_err() {
				tracing::warn!(?timeout, "Live value channel accept task did not stop; aborting");
				accept.abort();
			}
		}

		self.set_state(ChannelState::Stopped);
		tracing::info!("Live value channel stopped");
	}

	/// Sends `value` to every connected renderer and returns how many were reached.
	///
	/// Never fails: with no peers, or while stopped, this is a no-op returning 0.
	pub fn send_uniform_update(&self, value: f64) -> usize {
		self.broadcast(&WireMessage::update_uniform(value))
	}

	/// Sends `message` to every connected renderer and returns how many were reached.
	pub fn broadcast(&self, message: &WireMessage) -> usize {
		let text = match message.encode() {
			Ok(text) => text,
			Err(error) => {
				tracing::warn!(%error, kind = message.kind(), "Failed to encode frame");
				return 0;
			}
		};
		let frame = Message::text(text);
		let delivered = self
			.shared
			.peers
			.lock()
			.values()
			.filter(|peer| peer.outbound.send(frame.clone()).is_ok())
			.count();
		tracing::trace!(kind = message.kind(), delivered, "Broadcast frame");
		delivered
	}

	/// Current lifecycle state.
	pub fn state(&self) -> ChannelState {
		self.shared.lifecycle.lock().state
	}

	/// Whether the listener is running and how many peers are attached.
	pub fn connection_status(&self) -> ConnectionStatus {
		ConnectionStatus {
			is_running: self.state() == ChannelState::Running,
			client_count: self.shared.peers.lock().len(),
		}
	}

	/// True while at least one renderer is attached.
	pub fn is_connected(&self) -> bool {
		!self.shared.peers.lock().is_empty()
	}

	/// Address actually bound, while running.
	pub fn local_addr(&self) -> Option<SocketAddr> {
		self.shared
			.lifecycle
			.lock()
			.listener
			.as_ref()
			.map(|listener| listener.local_addr)
	}

	/// Subscribes to [`ChannelEvent`]s emitted from now on.
	pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
		self.shared.events.subscribe()
	}

	fn set_state(&self, state: ChannelState) {
		self.shared.lifecycle.lock().state = state;
	}
}

async fn accept_loop(shared: Arc<Shared>, listener: TcpListener, shutdown: CancellationToken) {
	loop {
		tokio::select! {
			_ = shutdown.cancelled() => break,
			res = listener.accept() => match res {
				Ok((stream, addr)) => {
					tokio::spawn(peer::serve(shared.clone(), stream, addr, shutdown.child_token()));
				}
				Err(e) => {
					tracing::error!(error = %e, "Failed to accept renderer connection");
				}
			}
		}
	}
	tracing::debug!("Live value channel accept loop finished");
}
