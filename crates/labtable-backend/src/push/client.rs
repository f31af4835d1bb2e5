//! Async Socket.IO client for the daemon's push channel.
//!
//! The [`PushClient`] connects over a websocket, completes the Engine.IO /
//! Socket.IO handshake, answers heartbeats, and forwards typed
//! [`PushEvent`]s through an mpsc channel.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       PushClient                          │
//! │                                                           │
//! │  ┌──────────────┐        ┌───────────────────────────┐   │
//! │  │  Public API  │        │  Background Task          │   │
//! │  │              │        │                           │   │
//! │  │ disconnect()─┼──cmd──▶│  websocket read loop      │   │
//! │  │              │  chan  │  ping → pong, open → 40   │   │
//! │  │ events()   ◀─┼──evt──◀│  42[...] → PushEvent      │   │
//! │  └──────────────┘  chan  │  lost → reconnect/backoff │   │
//! │                          └───────────────────────────┘   │
//! └──────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, RwLock};
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use labtable_core::prelude::*;
use labtable_core::PushEvent;

use super::protocol::{parse_frame, EnginePacket, Handshake, SocketPacket, CONNECT_FRAME};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Initial reconnection backoff duration.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Maximum reconnection backoff duration (cap).
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Maximum number of consecutive reconnection attempts before giving up.
pub const MAX_RECONNECT_ATTEMPTS: u32 = 10;

/// Capacity of the command channel.
const CMD_CHANNEL_CAPACITY: usize = 8;

/// Capacity of the event channel (updates can be bursty).
const EVENT_CHANNEL_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Current connection state of a [`PushClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    /// Not connected and not attempting to connect.
    Disconnected,
    /// Initial connection attempt in progress.
    Connecting,
    /// Connected and receiving events.
    Connected,
    /// Connection lost; background task is retrying.
    Reconnecting {
        /// The current reconnection attempt number (1-indexed).
        attempt: u32,
    },
}

/// What the background task reports to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum PushClientEvent {
    /// A typed push event from the daemon
    Event(PushEvent),
    /// Connection lost; retrying after a backoff
    Reconnecting { attempt: u32, max_attempts: u32 },
    /// Connection re-established after a loss
    Reconnected,
    /// The task has stopped; no further events follow
    Disconnected,
}

/// Internal messages sent from the public API to the background task.
enum ClientCommand {
    /// Close the websocket and stop the background task.
    Disconnect,
}

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// How one connection's read loop ended.
#[derive(Debug, PartialEq)]
enum LoopExit {
    /// Connection lost; try again
    Reconnect,
    /// Disconnect requested or nobody is listening
    Shutdown,
}

// ---------------------------------------------------------------------------
// PushClient
// ---------------------------------------------------------------------------

/// Socket.IO push channel client.
///
/// The background task cleans up automatically when the client is dropped
/// (the command channel closes, which signals the task to exit).
pub struct PushClient {
    cmd_tx: mpsc::Sender<ClientCommand>,
    state: Arc<RwLock<ConnectionState>>,
    event_rx: mpsc::Receiver<PushClientEvent>,
}

impl std::fmt::Debug for PushClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushClient")
            .field("connection_state", &self.connection_state())
            .finish()
    }
}

impl PushClient {
    /// Connect to the Socket.IO endpoint at `ws_url`.
    ///
    /// Spawns a background task that manages the websocket, including
    /// automatic reconnection with exponential backoff.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial websocket connection cannot be
    /// established.
    pub async fn connect(ws_url: &str) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<ClientCommand>(CMD_CHANNEL_CAPACITY);
        let (event_tx, event_rx) = mpsc::channel::<PushClientEvent>(EVENT_CHANNEL_CAPACITY);
        let state = Arc::new(RwLock::new(ConnectionState::Connecting));

        info!("Connecting to push channel at {}", ws_url);
        let ws_stream = connect_ws(ws_url).await?;
        set_state(&state, ConnectionState::Connected);

        tokio::spawn(run_client_task(
            ws_url.to_string(),
            ws_stream,
            cmd_rx,
            event_tx,
            Arc::clone(&state),
        ));

        Ok(Self {
            cmd_tx,
            state,
            event_rx,
        })
    }

    /// Receiver of push events and connection changes.
    pub fn event_receiver(&mut self) -> &mut mpsc::Receiver<PushClientEvent> {
        &mut self.event_rx
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_connected(&self) -> bool {
        self.connection_state() == ConnectionState::Connected
    }

    /// Gracefully close the connection. Returns immediately.
    pub async fn disconnect(&self) {
        // The task may already be gone
        let _ = self.cmd_tx.send(ClientCommand::Disconnect).await;
    }
}

fn set_state(state: &RwLock<ConnectionState>, value: ConnectionState) {
    let mut guard = state.write().unwrap_or_else(|e| e.into_inner());
    *guard = value;
}

// ---------------------------------------------------------------------------
// Background task
// ---------------------------------------------------------------------------

/// Entry point for the background websocket task.
async fn run_client_task(
    ws_url: String,
    ws_stream: WsStream,
    mut cmd_rx: mpsc::Receiver<ClientCommand>,
    event_tx: mpsc::Sender<PushClientEvent>,
    state: Arc<RwLock<ConnectionState>>,
) {
    let mut exit = run_io_loop(ws_stream, &mut cmd_rx, &event_tx).await;

    let mut attempt: u32 = 1;
    while exit == LoopExit::Reconnect {
        if attempt > MAX_RECONNECT_ATTEMPTS {
            error!(
                "Push channel: exceeded {} reconnection attempts, giving up",
                MAX_RECONNECT_ATTEMPTS
            );
            break;
        }

        set_state(&state, ConnectionState::Reconnecting { attempt });
        let _ = event_tx
            .send(PushClientEvent::Reconnecting {
                attempt,
                max_attempts: MAX_RECONNECT_ATTEMPTS,
            })
            .await;

        let backoff = compute_backoff(attempt);
        warn!(
            "Push channel: connection lost, retrying in {:?} (attempt {}/{})",
            backoff, attempt, MAX_RECONNECT_ATTEMPTS
        );
        tokio::time::sleep(backoff).await;

        if cmd_rx.is_closed() {
            break;
        }

        match connect_ws(&ws_url).await {
            Ok(ws_stream) => {
                info!("Push channel: reconnected (attempt {})", attempt);
                set_state(&state, ConnectionState::Connected);
                let _ = event_tx.send(PushClientEvent::Reconnected).await;
                attempt = 1;
                exit = run_io_loop(ws_stream, &mut cmd_rx, &event_tx).await;
            }
            Err(err) => {
                warn!(
                    "Push channel: reconnection attempt {} failed: {}",
                    attempt, err
                );
                attempt += 1;
            }
        }
    }

    set_state(&state, ConnectionState::Disconnected);
    let _ = event_tx.send(PushClientEvent::Disconnected).await;
    debug!("Push channel background task exiting");
}

/// Run one connection's read/write select loop.
async fn run_io_loop(
    ws_stream: WsStream,
    cmd_rx: &mut mpsc::Receiver<ClientCommand>,
    event_tx: &mpsc::Sender<PushClientEvent>,
) -> LoopExit {
    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    let mut heartbeat = Handshake::default().heartbeat();
    let mut deadline = Instant::now() + heartbeat;

    loop {
        tokio::select! {
            // ── Incoming websocket frame ─────────────────────────────────
            frame = ws_stream.next() => {
                deadline = Instant::now() + heartbeat;
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        match handle_ws_text(text.as_str(), &mut ws_sink, event_tx).await {
                            FrameOutcome::Continue => {}
                            FrameOutcome::Handshake(handshake) => {
                                heartbeat = handshake.heartbeat();
                                deadline = Instant::now() + heartbeat;
                            }
                            FrameOutcome::Exit(exit) => {
                                if exit == LoopExit::Shutdown {
                                    send_close(&mut ws_sink).await;
                                }
                                return exit;
                            }
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) => {
                        debug!("Push channel: received Close frame");
                        return LoopExit::Reconnect;
                    }
                    Some(Ok(_)) => {
                        // Ping/Pong/Binary — ignore
                    }
                    Some(Err(err)) => {
                        warn!("Push channel: websocket read error: {}", err);
                        return LoopExit::Reconnect;
                    }
                    None => {
                        debug!("Push channel: websocket stream ended");
                        return LoopExit::Reconnect;
                    }
                }
            }

            // ── Command from the public API ──────────────────────────────
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(ClientCommand::Disconnect) => {
                        send_close(&mut ws_sink).await;
                        return LoopExit::Shutdown;
                    }
                    None => {
                        debug!("Push channel: command channel closed, shutting down");
                        send_close(&mut ws_sink).await;
                        return LoopExit::Shutdown;
                    }
                }
            }

            // ── Missed heartbeats ────────────────────────────────────────
            _ = tokio::time::sleep_until(deadline) => {
                warn!("Push channel: no heartbeat for {:?}", heartbeat);
                return LoopExit::Reconnect;
            }
        }
    }
}

enum FrameOutcome {
    Continue,
    Handshake(Handshake),
    Exit(LoopExit),
}

/// Route an incoming text frame.
async fn handle_ws_text(
    text: &str,
    ws_sink: &mut SplitSink<WsStream, WsMessage>,
    event_tx: &mpsc::Sender<PushClientEvent>,
) -> FrameOutcome {
    let packet = match parse_frame(text) {
        Ok(packet) => packet,
        Err(err) => {
            warn!("Push channel: ignoring frame: {}", err);
            return FrameOutcome::Continue;
        }
    };

    match packet {
        EnginePacket::Open(handshake) => {
            debug!("Push channel: Engine.IO open (sid {})", handshake.sid);
            if let Err(err) = ws_sink.send(WsMessage::Text(CONNECT_FRAME.to_string().into())).await {
                warn!("Push channel: failed to send connect: {}", err);
                return FrameOutcome::Exit(LoopExit::Reconnect);
            }
            FrameOutcome::Handshake(handshake)
        }
        EnginePacket::Ping(payload) => {
            let pong = EnginePacket::pong_for(&payload);
            if let Err(err) = ws_sink.send(WsMessage::Text(pong.into())).await {
                warn!("Push channel: failed to send pong: {}", err);
                return FrameOutcome::Exit(LoopExit::Reconnect);
            }
            FrameOutcome::Continue
        }
        EnginePacket::Message(SocketPacket::Connect) => {
            info!("Push channel: namespace connected");
            FrameOutcome::Continue
        }
        EnginePacket::Message(SocketPacket::Event { name, payload }) => {
            let Some(event) = PushEvent::parse_event(&name, &payload) else {
                trace!("Push channel: ignoring event '{}'", name);
                return FrameOutcome::Continue;
            };
            trace!("Push channel: {}", event.summary());
            if event_tx.send(PushClientEvent::Event(event)).await.is_err() {
                debug!("Push channel: event receiver dropped");
                return FrameOutcome::Exit(LoopExit::Shutdown);
            }
            FrameOutcome::Continue
        }
        EnginePacket::Message(SocketPacket::ConnectError(detail)) => {
            warn!("Push channel: namespace connect refused: {}", detail);
            FrameOutcome::Exit(LoopExit::Reconnect)
        }
        EnginePacket::Message(SocketPacket::Disconnect) | EnginePacket::Close => {
            debug!("Push channel: server closed the session");
            FrameOutcome::Exit(LoopExit::Reconnect)
        }
        EnginePacket::Message(SocketPacket::Unsupported(kind)) => {
            trace!("Push channel: ignoring Socket.IO packet type {}", kind);
            FrameOutcome::Continue
        }
        EnginePacket::Pong(_) | EnginePacket::Upgrade | EnginePacket::Noop => {
            FrameOutcome::Continue
        }
    }
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Establish a new websocket connection to `ws_url`.
async fn connect_ws(ws_url: &str) -> Result<WsStream> {
    let (ws_stream, _response) = connect_async(ws_url)
        .await
        .map_err(|err| Error::push(format!("Failed to connect to push channel: {err}")))?;
    Ok(ws_stream)
}

/// Compute exponential backoff duration for reconnection attempt `n`.
///
/// The formula is `INITIAL_BACKOFF * 2^(n-1)`, capped at `MAX_BACKOFF`.
fn compute_backoff(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1);
    let multiplier: u64 = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
    let secs = INITIAL_BACKOFF.as_secs().saturating_mul(multiplier);
    Duration::from_secs(secs.min(MAX_BACKOFF.as_secs()))
}

/// Send a websocket Close frame, ignoring any write errors.
async fn send_close(ws_sink: &mut SplitSink<WsStream, WsMessage>) {
    let _ = ws_sink.send(WsMessage::Close(None)).await;
    let _ = ws_sink.close().await;
}
