//! Row and run operation handlers
//!
//! Every handler here acts on the row under the cursor. Operations that
//! change persisted state end by requesting a save of the whole table.

use chrono::Local;
use tracing::{debug, warn};

use labtable_core::Error;

use crate::state::{AppPhase, AppState, TableKind};
use crate::sync;

use super::{UpdateAction, UpdateResult};

/// Editor operations are ignored until the table has loaded, and always in
/// the log viewer.
fn editor_ready(state: &AppState) -> bool {
    state.phase == AppPhase::Ready && !state.is_read_only()
}

/// Request a save of the whole table.
pub(super) fn save(state: &mut AppState) -> UpdateResult {
    let seq = state.next_save_seq();
    let document = sync::to_document(&state.table, &state.ports, &state.extra);
    debug!("Queueing save #{} ({} rows)", seq, document.data.len());
    UpdateResult::action(UpdateAction::SaveSettings { seq, document })
}

pub fn handle_add_row(state: &mut AppState) -> UpdateResult {
    if !editor_ready(state) {
        return UpdateResult::none();
    }
    state.cursor.row = state.table.add_row();
    UpdateResult::none()
}

pub fn handle_remove_row(state: &mut AppState) -> UpdateResult {
    if !editor_ready(state) {
        return UpdateResult::none();
    }
    match state.table.remove_row(state.cursor.row) {
        Ok(_) => {
            state.clamp_cursor();
            save(state)
        }
        Err(_) => UpdateResult::none(),
    }
}

pub fn handle_move_up(state: &mut AppState) -> UpdateResult {
    if !editor_ready(state) || !state.table.move_up(state.cursor.row) {
        return UpdateResult::none();
    }
    state.cursor.row -= 1;
    save(state)
}

pub fn handle_move_down(state: &mut AppState) -> UpdateResult {
    if !editor_ready(state) || !state.table.move_down(state.cursor.row) {
        return UpdateResult::none();
    }
    state.cursor.row += 1;
    save(state)
}

pub fn handle_start_row(state: &mut AppState, singleshot: bool) -> UpdateResult {
    if !editor_ready(state) {
        return UpdateResult::none();
    }
    let now = Local::now().naive_local();
    match state.table.start(state.cursor.row, now, singleshot) {
        Ok(_) => save(state),
        Err(err @ Error::RowRunning) => {
            state.alert(err.to_string());
            UpdateResult::none()
        }
        Err(err @ Error::CounterExhausted { .. }) => {
            state.flash_error(err.to_string());
            UpdateResult::none()
        }
        Err(_) => UpdateResult::none(),
    }
}

pub fn handle_stop_row(state: &mut AppState) -> UpdateResult {
    if !editor_ready(state) {
        return UpdateResult::none();
    }
    match state.table.stop(state.cursor.row) {
        Ok(true) => save(state),
        _ => UpdateResult::none(),
    }
}

pub fn handle_save_now(state: &mut AppState) -> UpdateResult {
    if !editor_ready(state) {
        return UpdateResult::none();
    }
    save(state)
}

pub fn handle_delete_test(state: &mut AppState) -> UpdateResult {
    let TableKind::LogViewer { date } = state.kind else {
        return UpdateResult::none();
    };
    if state.phase != AppPhase::Ready {
        return UpdateResult::none();
    }
    let Some(rowid) = state.selected_row().map(|row| row.rowid) else {
        return UpdateResult::none();
    };
    match rowid {
        Some(rowid) => UpdateResult::action(UpdateAction::DeleteTest { date, rowid }),
        None => {
            warn!("Delete requested for a log row without test id");
            state.flash_error("Selected row has no test id");
            UpdateResult::none()
        }
    }
}
