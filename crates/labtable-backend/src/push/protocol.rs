//! Engine.IO v4 / Socket.IO v4 text framing
//!
//! Only the subset the acquisition daemon uses over a websocket transport:
//!
//! | frame              | meaning                                  |
//! |--------------------|------------------------------------------|
//! | `0{...}`           | Engine.IO open, carries ping timing      |
//! | `1`                | Engine.IO close                          |
//! | `2` / `3`          | ping / pong                              |
//! | `40`               | Socket.IO connect (default namespace)    |
//! | `41`               | Socket.IO disconnect                     |
//! | `42["name", data]` | Socket.IO event                          |
//! | `44{...}`          | Socket.IO connect error                  |

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use labtable_core::prelude::*;

/// Client → server: connect to the default namespace.
pub const CONNECT_FRAME: &str = "40";

/// Engine.IO protocol revision requested in the handshake URL.
pub const ENGINE_IO_VERSION: &str = "4";

/// Server ping interval used until the open packet says otherwise.
const DEFAULT_PING_INTERVAL_MS: u64 = 25_000;

/// Grace period after a missed ping until the open packet says otherwise.
const DEFAULT_PING_TIMEOUT_MS: u64 = 20_000;

/// Payload of the Engine.IO open packet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    #[serde(default)]
    pub sid: String,
    #[serde(default = "default_ping_interval")]
    pub ping_interval: u64,
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout: u64,
}

fn default_ping_interval() -> u64 {
    DEFAULT_PING_INTERVAL_MS
}

fn default_ping_timeout() -> u64 {
    DEFAULT_PING_TIMEOUT_MS
}

impl Handshake {
    /// How long the connection may stay silent before it is presumed dead.
    pub fn heartbeat(&self) -> Duration {
        Duration::from_millis(self.ping_interval.saturating_add(self.ping_timeout))
    }
}

impl Default for Handshake {
    fn default() -> Self {
        Self {
            sid: String::new(),
            ping_interval: DEFAULT_PING_INTERVAL_MS,
            ping_timeout: DEFAULT_PING_TIMEOUT_MS,
        }
    }
}

/// Engine.IO packet.
#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    /// Server heartbeat; the payload is echoed back in the pong
    Ping(String),
    Pong(String),
    Message(SocketPacket),
    Upgrade,
    Noop,
}

/// Socket.IO packet carried in an Engine.IO message.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect,
    Disconnect,
    Event { name: String, payload: Value },
    ConnectError(Value),
    /// Ack and binary packets; the daemon does not send them
    Unsupported(char),
}

impl EnginePacket {
    /// Pong reply for a ping.
    pub fn pong_for(payload: &str) -> String {
        format!("3{payload}")
    }
}

/// Parse one websocket text frame.
pub fn parse_frame(text: &str) -> Result<EnginePacket> {
    let mut chars = text.chars();
    let kind = chars
        .next()
        .ok_or_else(|| Error::protocol("empty Engine.IO frame"))?;
    let rest = chars.as_str();

    match kind {
        '0' => {
            let handshake = if rest.is_empty() {
                Handshake::default()
            } else {
                serde_json::from_str(rest)
                    .map_err(|e| Error::protocol(format!("bad open packet: {e}")))?
            };
            Ok(EnginePacket::Open(handshake))
        }
        '1' => Ok(EnginePacket::Close),
        '2' => Ok(EnginePacket::Ping(rest.to_string())),
        '3' => Ok(EnginePacket::Pong(rest.to_string())),
        '4' => parse_socket_packet(rest).map(EnginePacket::Message),
        '5' => Ok(EnginePacket::Upgrade),
        '6' => Ok(EnginePacket::Noop),
        other => Err(Error::protocol(format!(
            "unknown Engine.IO packet type '{other}'"
        ))),
    }
}

fn parse_socket_packet(text: &str) -> Result<SocketPacket> {
    let mut chars = text.chars();
    let kind = chars
        .next()
        .ok_or_else(|| Error::protocol("empty Socket.IO packet"))?;
    let body = strip_ack_id(strip_namespace(chars.as_str()));

    match kind {
        '0' => Ok(SocketPacket::Connect),
        '1' => Ok(SocketPacket::Disconnect),
        '2' => parse_event(body),
        '4' => Ok(SocketPacket::ConnectError(
            serde_json::from_str(body).unwrap_or(Value::Null),
        )),
        other => Ok(SocketPacket::Unsupported(other)),
    }
}

/// Drop a `/namespace,` prefix.
fn strip_namespace(body: &str) -> &str {
    if body.starts_with('/') {
        body.split_once(',').map_or("", |(_, rest)| rest)
    } else {
        body
    }
}

/// Drop a numeric ack id.
fn strip_ack_id(body: &str) -> &str {
    body.trim_start_matches(|c: char| c.is_ascii_digit())
}

fn parse_event(body: &str) -> Result<SocketPacket> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| Error::protocol(format!("bad event packet: {e}")))?;
    let Value::Array(mut items) = value else {
        return Err(Error::protocol("event packet is not an array"));
    };
    if items.is_empty() {
        return Err(Error::protocol("event packet has no name"));
    }

    let name = match items.remove(0) {
        Value::String(name) => name,
        other => {
            return Err(Error::protocol(format!(
                "event name is not a string: {other}"
            )))
        }
    };
    let payload = if items.is_empty() {
        Value::Null
    } else {
        items.remove(0)
    };

    Ok(SocketPacket::Event { name, payload })
}

/// Websocket URL of the Socket.IO endpoint for a server address.
///
/// `http://lab:5000` becomes
/// `ws://lab:5000/socket.io/?EIO=4&transport=websocket`. An explicit path or
/// query is kept.
pub fn socket_io_url(server: &str) -> Result<String> {
    let mut url = Url::parse(server).map_err(|_| Error::invalid_url(server))?;

    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        _ => return Err(Error::invalid_url(server)),
    };
    url.set_scheme(scheme)
        .map_err(|_| Error::invalid_url(server))?;

    if url.path() == "/" {
        url.set_path("/socket.io/");
    }
    if url.query().is_none() {
        url.set_query(Some(&format!(
            "EIO={ENGINE_IO_VERSION}&transport=websocket"
        )));
    }

    Ok(url.to_string())
}
