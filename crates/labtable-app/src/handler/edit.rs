//! Cursor movement and inline edit handlers

use tracing::debug;

use labtable_core::Error;

use crate::state::{AppPhase, AppState, EditTarget, Focus, UiMode};

use super::UpdateResult;

pub fn handle_cursor_up(state: &mut AppState) -> UpdateResult {
    match state.focus {
        Focus::Table => state.cursor.row = state.cursor.row.saturating_sub(1),
        Focus::Ports => state.port_cursor = state.port_cursor.saturating_sub(1),
    }
    UpdateResult::none()
}

pub fn handle_cursor_down(state: &mut AppState) -> UpdateResult {
    match state.focus {
        Focus::Table => state.cursor.row += 1,
        Focus::Ports => state.port_cursor += 1,
    }
    state.clamp_cursor();
    UpdateResult::none()
}

pub fn handle_cursor_left(state: &mut AppState) -> UpdateResult {
    if state.focus == Focus::Table {
        state.cursor.column = state.cursor.column.saturating_sub(1);
    }
    UpdateResult::none()
}

pub fn handle_cursor_right(state: &mut AppState) -> UpdateResult {
    if state.focus == Focus::Table {
        state.cursor.column += 1;
        state.clamp_cursor();
    }
    UpdateResult::none()
}

pub fn handle_cursor_home(state: &mut AppState) -> UpdateResult {
    if state.focus == Focus::Table {
        state.cursor.column = 0;
    }
    UpdateResult::none()
}

pub fn handle_cursor_end(state: &mut AppState) -> UpdateResult {
    if state.focus == Focus::Table {
        state.cursor.column = state.table.schema().named_len().saturating_sub(1);
    }
    UpdateResult::none()
}

pub fn handle_toggle_focus(state: &mut AppState) -> UpdateResult {
    state.focus = match state.focus {
        Focus::Table if !state.ports.is_empty() => Focus::Ports,
        _ => Focus::Table,
    };
    UpdateResult::none()
}

pub fn handle_begin_edit(state: &mut AppState) -> UpdateResult {
    if state.phase != AppPhase::Ready || state.is_read_only() {
        return UpdateResult::none();
    }

    match state.focus {
        Focus::Table => {
            let (row, column) = (state.cursor.row, state.cursor.column);
            let Some(current) = state
                .table
                .row(row)
                .map(|r| r.cell(column).unwrap_or_default().to_string())
            else {
                return UpdateResult::none();
            };
            if state.table.cell_editable(row, column) {
                state.mode = UiMode::Editing {
                    target: EditTarget::Cell { row, column },
                    buffer: current,
                };
            } else {
                let name = state
                    .table
                    .schema()
                    .fields()
                    .get(column)
                    .cloned()
                    .unwrap_or_default();
                state.flash_error(Error::cell_locked(name).to_string());
            }
        }
        Focus::Ports => {
            let index = state.port_cursor;
            if let Some((_, value)) = state.ports.entries().get(index) {
                state.mode = UiMode::Editing {
                    target: EditTarget::Port { index },
                    buffer: value.clone(),
                };
            }
        }
    }
    UpdateResult::none()
}

pub fn handle_edit_input(state: &mut AppState, c: char) -> UpdateResult {
    if let UiMode::Editing { buffer, .. } = &mut state.mode {
        buffer.push(c);
    }
    UpdateResult::none()
}

pub fn handle_edit_backspace(state: &mut AppState) -> UpdateResult {
    if let UiMode::Editing { buffer, .. } = &mut state.mode {
        buffer.pop();
    }
    UpdateResult::none()
}

/// Commit the edit buffer. Edits are not saved until the next save.
pub fn handle_commit_edit(state: &mut AppState) -> UpdateResult {
    let (target, buffer) = match std::mem::take(&mut state.mode) {
        UiMode::Editing { target, buffer } => (target, buffer),
        other => {
            state.mode = other;
            return UpdateResult::none();
        }
    };

    match target {
        EditTarget::Cell { row, column } => {
            if let Err(err) = state.table.edit_cell(row, column, buffer) {
                state.flash_error(err.to_string());
            }
        }
        EditTarget::Port { index } => {
            if state.ports.set_at(index, buffer) {
                debug!("Port {} updated", index);
            }
        }
    }
    UpdateResult::none()
}

pub fn handle_cancel_edit(state: &mut AppState) -> UpdateResult {
    if matches!(state.mode, UiMode::Editing { .. }) {
        state.mode = UiMode::Normal;
    }
    UpdateResult::none()
}

pub fn handle_dismiss_alert(state: &mut AppState) -> UpdateResult {
    if matches!(state.mode, UiMode::Alert { .. }) {
        state.mode = UiMode::Normal;
    }
    UpdateResult::none()
}
