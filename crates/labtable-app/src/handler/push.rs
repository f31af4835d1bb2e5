//! Push channel event handlers

use tracing::{debug, info, warn};

use labtable_core::PushEvent;

use crate::state::{AppPhase, AppState, PushStatus};

use super::{table_ops, UpdateResult};

pub fn handle_push_event(state: &mut AppState, event: PushEvent) -> UpdateResult {
    debug!("Push: {}", event.summary());
    if state.phase != AppPhase::Ready {
        return UpdateResult::none();
    }

    match event {
        PushEvent::Active(rowid) => {
            state.table.set_active(rowid);
            UpdateResult::none()
        }
        PushEvent::Update { rowid, amp } => match state.table.apply_update(rowid, amp) {
            Some(outcome) if outcome.auto_stopped => {
                info!("Single shot on row {} finished", outcome.index);
                table_ops::save(state)
            }
            _ => UpdateResult::none(),
        },
    }
}

pub fn handle_connected(state: &mut AppState) -> UpdateResult {
    state.push_status = PushStatus::Connected;
    UpdateResult::none()
}

pub fn handle_reconnecting(state: &mut AppState, attempt: u32, max_attempts: u32) -> UpdateResult {
    state.push_status = PushStatus::Reconnecting {
        attempt,
        max_attempts,
    };
    UpdateResult::none()
}

pub fn handle_reconnected(state: &mut AppState) -> UpdateResult {
    state.push_status = PushStatus::Connected;
    state.flash_info("Live updates reconnected");
    UpdateResult::none()
}

pub fn handle_disconnected(state: &mut AppState) -> UpdateResult {
    if state.should_quit() {
        return UpdateResult::none();
    }
    warn!("Push channel closed");
    state.push_status = PushStatus::Lost;
    state.flash_error("Live updates lost");
    UpdateResult::none()
}

pub fn handle_connection_failed(state: &mut AppState, error: String) -> UpdateResult {
    warn!("Push channel unavailable: {}", error);
    state.push_status = PushStatus::Lost;
    state.flash_error(format!("Live updates unavailable: {error}"));
    UpdateResult::none()
}
