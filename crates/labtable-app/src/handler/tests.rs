//! Tests for handler module

use super::*;
use crate::config::Settings;
use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::{AppPhase, AppState, EditTarget, FlashKind, Focus, PushStatus, UiMode};
use labtable_core::{LogDate, PushEvent, RowRecord, RunState, SaveStatus, SettingsDocument};

/// Editor with the table loaded and `rows` empty rows
fn ready_editor(rows: usize) -> AppState {
    let mut state = AppState::editor(Settings::default(), "test");
    state.phase = AppPhase::Ready;
    for _ in 0..rows {
        state.table.add_row();
    }
    state
}

fn log_viewer_with(ids: &[&str]) -> AppState {
    let date = LogDate::parse("10/19/2026").unwrap();
    let mut state = AppState::log_viewer(Settings::default(), date, "test");
    let document = SettingsDocument {
        data: ids
            .iter()
            .map(|id| [("testid", *id)].into_iter().collect::<RowRecord>())
            .collect(),
        ..Default::default()
    };
    update(&mut state, Message::SettingsLoaded { document });
    state
}

fn saved_document(result: &UpdateResult) -> &SettingsDocument {
    match &result.action {
        Some(UpdateAction::SaveSettings { document, .. }) => document,
        other => panic!("expected a save, got {other:?}"),
    }
}

fn is_save(result: &UpdateResult) -> bool {
    matches!(result.action, Some(UpdateAction::SaveSettings { .. }))
}

// ─────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────

#[test]
fn test_quit_message_sets_quitting_phase() {
    let mut state = ready_editor(0);

    update(&mut state, Message::Quit);

    assert!(state.should_quit());
}

#[test]
fn test_startup_loads_table_and_subscribes() {
    let mut state = AppState::editor(Settings::default(), "test");

    let actions = startup_actions(&mut state);

    assert!(matches!(actions[0], UpdateAction::LoadSettings));
    assert!(matches!(
        &actions[1],
        UpdateAction::ConnectPush { server } if server == "http://localhost:5000"
    ));
    assert_eq!(state.push_status, PushStatus::Connecting);
}

#[test]
fn test_log_viewer_startup_loads_day_only() {
    let date = LogDate::parse("01/02/2026").unwrap();
    let mut state = AppState::log_viewer(Settings::default(), date, "test");

    let actions = startup_actions(&mut state);

    assert_eq!(actions.len(), 1);
    assert!(matches!(actions[0], UpdateAction::LoadLog { date: d } if d == date));
}

#[test]
fn test_operations_ignored_while_loading() {
    let mut state = AppState::editor(Settings::default(), "test");

    let result = update(&mut state, Message::AddRow);

    assert!(state.table.is_empty());
    assert!(result.action.is_none());
}

#[test]
fn test_settings_loaded_materializes_rows() {
    let mut state = AppState::editor(Settings::default(), "test");
    let document = SettingsDocument::from_json(
        r#"{"last_tid": 7, "scope_port": "COM3", "mac": "x",
            "data": [{"testid": "7", "serialnumber": "SN9", "run(y/n)": "y"}]}"#,
    )
    .unwrap();

    update(&mut state, Message::SettingsLoaded { document });

    assert_eq!(state.phase, AppPhase::Ready);
    assert_eq!(state.table.last_tid(), 7);
    let row = state.table.row(0).unwrap();
    assert_eq!(row.cell(3), Some("SN9"));
    assert_eq!(row.rowid, Some(7));
    assert!(row.is_running());
    assert_eq!(state.ports.get("scope_port"), Some("COM3"));
    assert!(state.extra.contains_key("mac"));
}

#[test]
fn test_settings_load_failure_leaves_empty_table_usable() {
    let mut state = AppState::editor(Settings::default(), "test");

    update(
        &mut state,
        Message::SettingsLoadFailed {
            error: "connection refused".into(),
        },
    );

    assert_eq!(state.phase, AppPhase::Ready);
    assert_eq!(state.flash.as_ref().unwrap().kind, FlashKind::Error);
}

// ─────────────────────────────────────────────────────────
// Table operations
// ─────────────────────────────────────────────────────────

#[test]
fn test_add_row_does_not_save() {
    let mut state = ready_editor(1);

    let result = update(&mut state, Message::AddRow);

    assert_eq!(state.table.len(), 2);
    assert_eq!(state.cursor.row, 1);
    assert!(!is_save(&result));
}

#[test]
fn test_remove_row_saves_remaining_rows() {
    let mut state = ready_editor(2);
    state.cursor.row = 1;

    let result = update(&mut state, Message::RemoveRow);

    assert_eq!(state.table.len(), 1);
    assert_eq!(state.cursor.row, 0);
    assert_eq!(saved_document(&result).data.len(), 1);
}

#[test]
fn test_remove_on_empty_table_is_noop() {
    let mut state = ready_editor(0);
    let result = update(&mut state, Message::RemoveRow);
    assert!(!is_save(&result));
}

#[test]
fn test_move_saves_only_when_row_moves() {
    let mut state = ready_editor(2);
    state.table.edit_cell(1, 3, "second".into()).unwrap();
    state.cursor.row = 1;

    let result = update(&mut state, Message::MoveUp);
    assert!(is_save(&result));
    assert_eq!(state.cursor.row, 0);
    assert_eq!(saved_document(&result).data[0].get("serialnumber"), Some("second"));

    let result = update(&mut state, Message::MoveUp);
    assert!(!is_save(&result));

    state.cursor.row = 1;
    let result = update(&mut state, Message::MoveDown);
    assert!(!is_save(&result));
}

#[test]
fn test_save_now_exports_whole_table() {
    let mut state = ready_editor(3);

    let result = update(&mut state, Message::SaveNow);

    assert_eq!(saved_document(&result).data.len(), 3);
    assert_eq!(state.save_seq, 1);
}

// ─────────────────────────────────────────────────────────
// Run operations
// ─────────────────────────────────────────────────────────

#[test]
fn test_start_assigns_next_id_and_saves() {
    let mut state = ready_editor(1);
    state.table.replace(state.table.rows().to_vec(), 41);

    let result = update(&mut state, Message::StartRow { singleshot: false });

    let document = saved_document(&result);
    assert_eq!(document.last_tid, 42);
    assert_eq!(document.data[0].get("testid"), Some("42"));
    assert_eq!(document.data[0].get("run(y/n)"), Some("y"));
    assert_eq!(document.data[0].get("singleshot"), None);
}

#[test]
fn test_start_running_row_alerts_without_saving() {
    let mut state = ready_editor(1);
    update(&mut state, Message::StartRow { singleshot: false });
    let before = state.table.row(0).unwrap().clone();

    let result = update(&mut state, Message::StartRow { singleshot: true });

    assert!(!is_save(&result));
    assert_eq!(state.table.row(0).unwrap(), &before);
    assert_eq!(state.table.last_tid(), 1);
    assert_eq!(
        state.mode,
        UiMode::Alert {
            message: "Please stop current test before starting a new one".into()
        }
    );
}

#[test]
fn test_start_with_exhausted_counter_flashes_without_saving() {
    let mut state = ready_editor(1);
    state.table.replace(state.table.rows().to_vec(), u64::MAX);

    let result = update(&mut state, Message::StartRow { singleshot: false });

    assert!(!is_save(&result));
    assert!(!state.table.row(0).unwrap().is_running());
    let flash = state.flash.as_ref().unwrap();
    assert_eq!(flash.kind, FlashKind::Error);
    assert!(flash.text.contains("counter exhausted"));
}

#[test]
fn test_two_starts_yield_increasing_ids() {
    let mut state = ready_editor(2);

    update(&mut state, Message::StartRow { singleshot: false });
    state.cursor.row = 1;
    update(&mut state, Message::StartRow { singleshot: true });

    let ids: Vec<_> = state.table.rows().iter().map(|r| r.rowid).collect();
    assert_eq!(ids, [Some(1), Some(2)]);
}

#[test]
fn test_stop_saves_and_stopping_idle_does_not() {
    let mut state = ready_editor(1);
    update(&mut state, Message::StartRow { singleshot: true });

    let result = update(&mut state, Message::StopRow);
    let document = saved_document(&result);
    assert_eq!(document.data[0].get("run(y/n)"), Some("n"));
    assert_eq!(document.data[0].get("singleshot"), None);

    let result = update(&mut state, Message::StopRow);
    assert!(!is_save(&result));
}

// ─────────────────────────────────────────────────────────
// Editing
// ─────────────────────────────────────────────────────────

#[test]
fn test_edit_cell_commit_does_not_save() {
    let mut state = ready_editor(1);
    state.cursor.column = 5;

    update(&mut state, Message::BeginEdit);
    update(&mut state, Message::EditInput('A'));
    update(&mut state, Message::EditInput('x'));
    update(&mut state, Message::EditBackspace);
    let result = update(&mut state, Message::CommitEdit);

    assert!(!is_save(&result));
    assert_eq!(state.mode, UiMode::Normal);
    assert_eq!(state.table.row(0).unwrap().cell(5), Some("A"));
}

#[test]
fn test_commit_outside_edit_mode_keeps_alert() {
    let mut state = ready_editor(1);
    state.alert("stop first");

    update(&mut state, Message::CommitEdit);

    assert_eq!(
        state.mode,
        UiMode::Alert {
            message: "stop first".into()
        }
    );
}

#[test]
fn test_begin_edit_on_locked_column_flashes() {
    let mut state = ready_editor(1);
    state.cursor.column = 1;

    update(&mut state, Message::BeginEdit);

    assert_eq!(state.mode, UiMode::Normal);
    let flash = state.flash.as_ref().unwrap();
    assert_eq!(flash.kind, FlashKind::Error);
    assert!(flash.text.contains("TestID"));
}

#[test]
fn test_begin_edit_on_running_row_refused() {
    let mut state = ready_editor(1);
    update(&mut state, Message::StartRow { singleshot: false });
    state.cursor.column = 5;

    update(&mut state, Message::BeginEdit);

    assert_eq!(state.mode, UiMode::Normal);
}

#[test]
fn test_cancel_edit_keeps_value() {
    let mut state = ready_editor(1);
    state.table.edit_cell(0, 5, "B".into()).unwrap();
    state.cursor.column = 5;

    update(&mut state, Message::BeginEdit);
    update(&mut state, Message::EditInput('C'));
    update(&mut state, Message::CancelEdit);

    assert_eq!(state.table.row(0).unwrap().cell(5), Some("B"));
}

#[test]
fn test_edit_port_through_panel() {
    let mut settings = Settings::default();
    settings.table.ports = vec!["scope_port".into()];
    let mut state = AppState::editor(settings, "test");
    state.phase = AppPhase::Ready;

    update(&mut state, Message::ToggleFocus);
    assert_eq!(state.focus, Focus::Ports);
    update(&mut state, Message::BeginEdit);
    assert!(matches!(
        state.mode,
        UiMode::Editing {
            target: EditTarget::Port { index: 0 },
            ..
        }
    ));
    for c in "COM7".chars() {
        update(&mut state, Message::EditInput(c));
    }
    update(&mut state, Message::CommitEdit);

    let result = update(&mut state, Message::SaveNow);
    assert_eq!(
        saved_document(&result).extra.get("scope_port"),
        Some(&serde_json::json!("COM7"))
    );
}

#[test]
fn test_toggle_focus_without_ports_stays_on_table() {
    let mut state = ready_editor(0);
    update(&mut state, Message::ToggleFocus);
    assert_eq!(state.focus, Focus::Table);
}

#[test]
fn test_commit_edit_leaves_alert_alone() {
    let mut state = ready_editor(0);
    state.alert("boom");

    update(&mut state, Message::CommitEdit);

    assert!(matches!(state.mode, UiMode::Alert { .. }));
}

#[test]
fn test_cursor_stays_inside_table() {
    let mut state = ready_editor(2);

    update(&mut state, Message::CursorDown);
    update(&mut state, Message::CursorDown);
    update(&mut state, Message::CursorDown);
    update(&mut state, Message::CursorEnd);
    update(&mut state, Message::CursorRight);

    assert_eq!(state.cursor.row, 1);
    assert_eq!(state.cursor.column, 13);

    update(&mut state, Message::CursorHome);
    update(&mut state, Message::CursorLeft);
    assert_eq!(state.cursor.column, 0);
}

// ─────────────────────────────────────────────────────────
// Store results
// ─────────────────────────────────────────────────────────

#[test]
fn test_save_completed_flashes_status() {
    let mut state = ready_editor(0);

    update(
        &mut state,
        Message::SaveCompleted {
            seq: 1,
            status: SaveStatus::success(),
        },
    );

    let flash = state.flash.as_ref().unwrap();
    assert_eq!(flash.text, "success!");
    assert_eq!(flash.kind, FlashKind::Info);
}

#[test]
fn test_rejected_save_status_flashes_error() {
    let mut state = ready_editor(0);

    update(
        &mut state,
        Message::SaveCompleted {
            seq: 1,
            status: SaveStatus {
                status: "disk full".into(),
            },
        },
    );

    assert_eq!(state.flash.as_ref().unwrap().kind, FlashKind::Error);
}

#[test]
fn test_save_failure_flashes_error() {
    let mut state = ready_editor(0);

    update(
        &mut state,
        Message::SaveFailed {
            seq: 2,
            error: "timed out".into(),
        },
    );

    let flash = state.flash.as_ref().unwrap();
    assert_eq!(flash.kind, FlashKind::Error);
    assert!(flash.text.contains("timed out"));
}

// ─────────────────────────────────────────────────────────
// Log viewer
// ─────────────────────────────────────────────────────────

#[test]
fn test_log_viewer_delete_waits_for_acknowledgement() {
    let mut state = log_viewer_with(&["3", "4"]);
    state.cursor.row = 1;

    let result = update(&mut state, Message::DeleteTest);

    assert!(matches!(
        result.action,
        Some(UpdateAction::DeleteTest { rowid: 4, .. })
    ));
    assert_eq!(state.table.len(), 2);

    update(&mut state, Message::TestDeleted { rowid: 4 });
    assert_eq!(state.table.len(), 1);
    assert_eq!(state.cursor.row, 0);
}

#[test]
fn test_log_viewer_delete_failure_keeps_row() {
    let mut state = log_viewer_with(&["3"]);

    update(
        &mut state,
        Message::DeleteFailed {
            rowid: 3,
            error: "HTTP 500".into(),
        },
    );

    assert_eq!(state.table.len(), 1);
    assert_eq!(state.flash.as_ref().unwrap().kind, FlashKind::Error);
}

#[test]
fn test_log_viewer_rejects_editor_operations() {
    let mut state = log_viewer_with(&["3"]);

    assert!(update(&mut state, Message::StartRow { singleshot: false })
        .action
        .is_none());
    assert!(update(&mut state, Message::RemoveRow).action.is_none());
    update(&mut state, Message::BeginEdit);
    assert_eq!(state.mode, UiMode::Normal);
}

#[test]
fn test_delete_ignored_in_editor() {
    let mut state = ready_editor(1);
    assert!(update(&mut state, Message::DeleteTest).action.is_none());
}

// ─────────────────────────────────────────────────────────
// Push events
// ─────────────────────────────────────────────────────────

#[test]
fn test_active_event_marks_single_row() {
    let mut state = ready_editor(2);
    update(&mut state, Message::StartRow { singleshot: false });
    state.cursor.row = 1;
    update(&mut state, Message::StartRow { singleshot: false });

    update(&mut state, Message::Push(PushEvent::Active(Some(2))));
    let active: Vec<bool> = state.table.rows().iter().map(|r| r.active).collect();
    assert_eq!(active, [false, true]);

    update(&mut state, Message::Push(PushEvent::Active(None)));
    assert!(state.table.rows().iter().all(|r| !r.active));
}

#[test]
fn test_update_stops_singleshot_row_once_and_saves() {
    let mut state = ready_editor(1);
    update(&mut state, Message::StartRow { singleshot: true });
    let event = PushEvent::Update {
        rowid: Some(1),
        amp: vec![0.0, 0.5, 1.0],
    };

    let first = update(&mut state, Message::Push(event.clone()));
    assert_eq!(state.table.row(0).unwrap().state, RunState::Idle);
    let document = saved_document(&first);
    assert_eq!(document.data[0].get("run(y/n)"), Some("n"));
    assert_eq!(document.data[0].get("singleshot"), None);

    let second = update(&mut state, Message::Push(event));
    assert!(!is_save(&second));
    assert!(state.table.row(0).unwrap().waveform.is_some());
}

#[test]
fn test_update_for_normal_run_does_not_save() {
    let mut state = ready_editor(1);
    update(&mut state, Message::StartRow { singleshot: false });

    let result = update(
        &mut state,
        Message::Push(PushEvent::Update {
            rowid: Some(1),
            amp: vec![1.0, 2.0],
        }),
    );

    assert!(!is_save(&result));
    assert!(state.table.row(0).unwrap().is_running());
}

#[test]
fn test_push_connection_states() {
    let mut state = ready_editor(0);

    update(
        &mut state,
        Message::PushReconnecting {
            attempt: 2,
            max_attempts: 10,
        },
    );
    assert_eq!(
        state.push_status,
        PushStatus::Reconnecting {
            attempt: 2,
            max_attempts: 10
        }
    );

    update(&mut state, Message::PushReconnected);
    assert_eq!(state.push_status, PushStatus::Connected);

    update(&mut state, Message::PushDisconnected);
    assert_eq!(state.push_status, PushStatus::Lost);
}

// ─────────────────────────────────────────────────────────
// Keys
// ─────────────────────────────────────────────────────────

#[test]
fn test_ctrl_c_quits_in_every_mode() {
    let mut state = ready_editor(0);
    assert!(matches!(
        handle_key(&state, InputKey::CharCtrl('c')),
        Some(Message::Quit)
    ));

    state.alert("x");
    assert!(matches!(
        handle_key(&state, InputKey::CharCtrl('c')),
        Some(Message::Quit)
    ));
}

#[test]
fn test_editor_keys() {
    let state = ready_editor(1);

    assert!(matches!(handle_key(&state, InputKey::Char('a')), Some(Message::AddRow)));
    assert!(matches!(
        handle_key(&state, InputKey::Char('r')),
        Some(Message::StartRow { singleshot: false })
    ));
    assert!(matches!(
        handle_key(&state, InputKey::Char('o')),
        Some(Message::StartRow { singleshot: true })
    ));
    assert!(matches!(handle_key(&state, InputKey::Char('x')), Some(Message::StopRow)));
    assert!(matches!(handle_key(&state, InputKey::Char('K')), Some(Message::MoveUp)));
    assert!(matches!(
        handle_key(&state, InputKey::CharCtrl('s')),
        Some(Message::SaveNow)
    ));
    assert!(matches!(handle_key(&state, InputKey::Enter), Some(Message::BeginEdit)));
}

#[test]
fn test_editing_mode_captures_letters() {
    let mut state = ready_editor(1);
    state.mode = UiMode::Editing {
        target: EditTarget::Cell { row: 0, column: 3 },
        buffer: String::new(),
    };

    assert!(matches!(
        handle_key(&state, InputKey::Char('q')),
        Some(Message::EditInput('q'))
    ));
    assert!(matches!(handle_key(&state, InputKey::Enter), Some(Message::CommitEdit)));
}

#[test]
fn test_any_key_dismisses_alert() {
    let mut state = ready_editor(0);
    state.alert("Please stop current test before starting a new one");

    let msg = handle_key(&state, InputKey::Char('z')).unwrap();
    update(&mut state, msg);

    assert_eq!(state.mode, UiMode::Normal);
}

#[test]
fn test_loading_only_accepts_quit() {
    let state = AppState::editor(Settings::default(), "test");
    assert!(handle_key(&state, InputKey::Char('a')).is_none());
    assert!(matches!(handle_key(&state, InputKey::Char('q')), Some(Message::Quit)));
}

#[test]
fn test_log_viewer_delete_key() {
    let state = log_viewer_with(&["1"]);
    assert!(matches!(handle_key(&state, InputKey::Char('d')), Some(Message::DeleteTest)));
    assert!(handle_key(&state, InputKey::Char('r')).is_none());
}
