//! Main update function - handles state transitions (TEA pattern)

use std::time::Instant;

use crate::message::Message;
use crate::state::{AppPhase, AppState};

use super::{edit, keys::handle_key, push, store, table_ops, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.phase = AppPhase::Quitting;
            UpdateResult::none()
        }

        Message::Key(key) => {
            if let Some(msg) = handle_key(state, key) {
                UpdateResult::message(msg)
            } else {
                UpdateResult::none()
            }
        }

        Message::Tick => {
            state.expire_flash(Instant::now());
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Table Operations
        // ─────────────────────────────────────────────────────────
        Message::AddRow => table_ops::handle_add_row(state),
        Message::RemoveRow => table_ops::handle_remove_row(state),
        Message::MoveUp => table_ops::handle_move_up(state),
        Message::MoveDown => table_ops::handle_move_down(state),
        Message::StartRow { singleshot } => table_ops::handle_start_row(state, singleshot),
        Message::StopRow => table_ops::handle_stop_row(state),
        Message::SaveNow => table_ops::handle_save_now(state),
        Message::DeleteTest => table_ops::handle_delete_test(state),

        // ─────────────────────────────────────────────────────────
        // Navigation and Editing
        // ─────────────────────────────────────────────────────────
        Message::CursorUp => edit::handle_cursor_up(state),
        Message::CursorDown => edit::handle_cursor_down(state),
        Message::CursorLeft => edit::handle_cursor_left(state),
        Message::CursorRight => edit::handle_cursor_right(state),
        Message::CursorHome => edit::handle_cursor_home(state),
        Message::CursorEnd => edit::handle_cursor_end(state),
        Message::ToggleFocus => edit::handle_toggle_focus(state),
        Message::BeginEdit => edit::handle_begin_edit(state),
        Message::EditInput(c) => edit::handle_edit_input(state, c),
        Message::EditBackspace => edit::handle_edit_backspace(state),
        Message::CommitEdit => edit::handle_commit_edit(state),
        Message::CancelEdit => edit::handle_cancel_edit(state),
        Message::DismissAlert => edit::handle_dismiss_alert(state),

        // ─────────────────────────────────────────────────────────
        // Settings Store Results
        // ─────────────────────────────────────────────────────────
        Message::SettingsLoaded { document } => store::handle_settings_loaded(state, document),
        Message::SettingsLoadFailed { error } => store::handle_settings_load_failed(state, error),
        Message::SaveCompleted { seq, status } => store::handle_save_completed(state, seq, status),
        Message::SaveFailed { seq, error } => store::handle_save_failed(state, seq, error),
        Message::TestDeleted { rowid } => store::handle_test_deleted(state, rowid),
        Message::DeleteFailed { rowid, error } => store::handle_delete_failed(state, rowid, error),

        // ─────────────────────────────────────────────────────────
        // Push Channel
        // ─────────────────────────────────────────────────────────
        Message::Push(event) => push::handle_push_event(state, event),
        Message::PushConnected => push::handle_connected(state),
        Message::PushReconnecting {
            attempt,
            max_attempts,
        } => push::handle_reconnecting(state, attempt, max_attempts),
        Message::PushReconnected => push::handle_reconnected(state),
        Message::PushDisconnected => push::handle_disconnected(state),
        Message::PushConnectionFailed { error } => push::handle_connection_failed(state, error),
    }
}
