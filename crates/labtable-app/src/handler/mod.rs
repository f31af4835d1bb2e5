//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `table_ops`: Row and run operations, save requests
//! - `edit`: Cursor movement and inline editing
//! - `store`: Load, save and delete results
//! - `push`: Push channel events and connection state
//! - `keys`: Key event handlers for UI modes

pub(crate) mod edit;
pub(crate) mod keys;
pub(crate) mod push;
pub(crate) mod store;
pub(crate) mod table_ops;
pub(crate) mod update;

#[cfg(test)]
mod tests;

use labtable_core::{LogDate, RowId, SettingsDocument};

use crate::message::Message;
use crate::state::{AppState, PushStatus, TableKind};

// Re-export main entry point
pub use update::update;

#[cfg(test)]
pub(crate) use keys::handle_key;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Fetch the persisted table
    LoadSettings,

    /// Fetch one day's test log
    LoadLog { date: LogDate },

    /// Send the whole table as the replacement backend state
    SaveSettings {
        /// Only used to correlate log lines; the backend keeps whichever
        /// save completes last
        seq: u64,
        document: SettingsDocument,
    },

    /// Delete one test from a day's log
    DeleteTest { date: LogDate, rowid: RowId },

    /// Subscribe to the push channel for the rest of the session
    ConnectPush { server: String },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}

/// Actions to run once at startup: the initial load and, for the editor,
/// the push subscription.
pub fn startup_actions(state: &mut AppState) -> Vec<UpdateAction> {
    let mut actions = vec![match state.kind {
        TableKind::Editor => UpdateAction::LoadSettings,
        TableKind::LogViewer { date } => UpdateAction::LoadLog { date },
    }];
    if let Some(server) = state.push_server() {
        state.push_status = PushStatus::Connecting;
        actions.push(UpdateAction::ConnectPush { server });
    }
    actions
}
