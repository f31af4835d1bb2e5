//! Server push channel
//!
//! - [`protocol`] parses Engine.IO / Socket.IO text frames.
//! - [`client`] owns the websocket, answers heartbeats and reconnects.

pub mod client;
pub mod protocol;

pub use client::{ConnectionState, PushClient, PushClientEvent, MAX_RECONNECT_ATTEMPTS};
pub use protocol::{parse_frame, socket_io_url, EnginePacket, Handshake, SocketPacket};
