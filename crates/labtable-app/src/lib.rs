//! labtable-app - Application state and orchestration for labtable
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the test
//! table: the table and run controllers, settings synchronization with the
//! backend, push event handling, configuration loading, and signal handling.

pub mod actions;
pub mod config;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod process;
pub mod signals;
pub mod state;
pub mod sync;
pub mod table;

// Re-export primary types
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use state::AppState;
pub use sync::PortPanel;
pub use table::TestTable;
