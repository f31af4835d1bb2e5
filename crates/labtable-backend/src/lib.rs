//! # labtable-backend - Backend Clients
//!
//! Talks to the acquisition daemon that owns the instruments: loads and
//! saves the settings document, serves the daily test log, and streams push
//! events over Socket.IO.
//!
//! Depends on [`labtable_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Settings Stores
//! - [`TableBackend`] - Load/save/log operations (Send variant of [`LocalTableBackend`])
//! - [`Backend`] - Store selected at startup (HTTP or file)
//! - [`HttpBackend`] - `/table_load`, `/table_save`, `/<date>/del_test`
//! - [`FileBackend`] - Local JSON file answering like the daemon
//!
//! ### Push Channel
//! - [`PushClient`] - Socket.IO websocket client with reconnect/backoff
//! - [`PushClientEvent`] - Events and connection changes from the client
//! - [`socket_io_url()`] - Socket.IO endpoint URL for a server address

pub mod file;
pub mod http;
pub mod push;
pub mod store;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use file::FileBackend;
pub use http::{HttpBackend, DEFAULT_TIMEOUT};
pub use push::{socket_io_url, ConnectionState, PushClient, PushClientEvent};
pub use store::{Backend, LocalTableBackend, TableBackend};
