//! Message types for the application (TEA pattern)

use labtable_core::{PushEvent, RowId, SaveStatus, SettingsDocument};

use crate::input_key::InputKey;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Tick event for periodic updates (flash expiry)
    Tick,

    /// Quit (q, Ctrl+C, signal handler)
    Quit,

    // ─────────────────────────────────────────────────────────
    // Table Operations
    // ─────────────────────────────────────────────────────────
    /// Append an empty row
    AddRow,
    /// Remove the selected row, then save
    RemoveRow,
    /// Swap the selected row with the one above, then save
    MoveUp,
    /// Swap the selected row with the one below, then save
    MoveDown,
    /// Start a run on the selected row, then save
    StartRow { singleshot: bool },
    /// Stop the selected row, then save
    StopRow,
    /// Save the whole table (export)
    SaveNow,

    // ─────────────────────────────────────────────────────────
    // Navigation and Editing
    // ─────────────────────────────────────────────────────────
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    /// Switch focus between the table and the port panel
    ToggleFocus,
    /// Open the selected cell or port for editing
    BeginEdit,
    EditInput(char),
    EditBackspace,
    CommitEdit,
    CancelEdit,
    DismissAlert,

    // ─────────────────────────────────────────────────────────
    // Log Viewer
    // ─────────────────────────────────────────────────────────
    /// Ask the backend to delete the selected test from the day's log
    DeleteTest,

    // ─────────────────────────────────────────────────────────
    // Settings Store Results
    // ─────────────────────────────────────────────────────────
    SettingsLoaded { document: SettingsDocument },
    SettingsLoadFailed { error: String },
    SaveCompleted { seq: u64, status: SaveStatus },
    SaveFailed { seq: u64, error: String },
    /// Backend acknowledged a log delete
    TestDeleted { rowid: RowId },
    DeleteFailed { rowid: RowId, error: String },

    // ─────────────────────────────────────────────────────────
    // Push Channel
    // ─────────────────────────────────────────────────────────
    Push(PushEvent),
    PushConnected,
    PushReconnecting { attempt: u32, max_attempts: u32 },
    PushReconnected,
    /// The client stopped after exhausting its reconnect attempts
    PushDisconnected,
    PushConnectionFailed { error: String },
}
