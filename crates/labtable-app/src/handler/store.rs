//! Settings store result handlers

use tracing::{debug, info, warn};

use labtable_core::{RowId, SaveStatus, SettingsDocument};

use crate::state::{AppPhase, AppState};
use crate::sync;

use super::UpdateResult;

pub fn handle_settings_loaded(state: &mut AppState, document: SettingsDocument) -> UpdateResult {
    if state.should_quit() {
        return UpdateResult::none();
    }

    let suffix = state.settings.table.port_suffix.clone();
    state.extra = sync::materialize(document, &mut state.table, &mut state.ports, &suffix);
    state.phase = AppPhase::Ready;
    state.clamp_cursor();

    info!(
        "Table loaded: {} rows, last test id {}",
        state.table.len(),
        state.table.last_tid()
    );
    UpdateResult::none()
}

pub fn handle_settings_load_failed(state: &mut AppState, error: String) -> UpdateResult {
    warn!("Loading the table failed: {}", error);
    if !state.should_quit() {
        state.phase = AppPhase::Ready;
    }
    state.flash_error(format!("Load failed: {error}"));
    UpdateResult::none()
}

pub fn handle_save_completed(state: &mut AppState, seq: u64, status: SaveStatus) -> UpdateResult {
    debug!("Save #{} answered '{}'", seq, status.status);
    if status.status == SaveStatus::SUCCESS {
        state.flash_info(status.status);
    } else {
        warn!("Save #{} was not accepted: {}", seq, status.status);
        state.flash_error(status.status);
    }
    UpdateResult::none()
}

pub fn handle_save_failed(state: &mut AppState, seq: u64, error: String) -> UpdateResult {
    warn!("Save #{} failed: {}", seq, error);
    state.flash_error(format!("Save failed: {error}"));
    UpdateResult::none()
}

/// The backend removed the test; only now does the row leave the table.
pub fn handle_test_deleted(state: &mut AppState, rowid: RowId) -> UpdateResult {
    if state.table.remove_by_rowid(rowid).is_some() {
        state.clamp_cursor();
        state.flash_info(format!("Deleted test {rowid}"));
    }
    UpdateResult::none()
}

pub fn handle_delete_failed(state: &mut AppState, rowid: RowId, error: String) -> UpdateResult {
    warn!("Deleting test {} failed: {}", rowid, error);
    state.flash_error(format!("Delete of test {rowid} failed: {error}"));
    UpdateResult::none()
}
