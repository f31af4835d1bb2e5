//! Key event handlers for different UI modes

use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::{AppPhase, AppState, UiMode};

/// Convert key events to messages based on current UI mode
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    // Force quit works everywhere
    if key == InputKey::CharCtrl('c') {
        return Some(Message::Quit);
    }

    match &state.mode {
        UiMode::Alert { .. } => handle_key_alert(key),
        UiMode::Editing { .. } => handle_key_editing(key),
        UiMode::Normal if state.phase == AppPhase::Loading => handle_key_loading(key),
        UiMode::Normal if state.is_read_only() => handle_key_log_viewer(key),
        UiMode::Normal => handle_key_editor(key),
    }
}

/// Any key closes the alert
fn handle_key_alert(_key: InputKey) -> Option<Message> {
    Some(Message::DismissAlert)
}

fn handle_key_loading(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('q') | InputKey::Esc => Some(Message::Quit),
        _ => None,
    }
}

fn handle_key_editing(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Enter => Some(Message::CommitEdit),
        InputKey::Esc => Some(Message::CancelEdit),
        InputKey::Backspace => Some(Message::EditBackspace),
        InputKey::Char(c) => Some(Message::EditInput(c)),
        _ => None,
    }
}

/// Navigation keys shared by the editor and the log viewer
fn handle_key_navigation(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Up | InputKey::Char('k') => Some(Message::CursorUp),
        InputKey::Down | InputKey::Char('j') => Some(Message::CursorDown),
        InputKey::Left | InputKey::Char('h') => Some(Message::CursorLeft),
        InputKey::Right | InputKey::Char('l') => Some(Message::CursorRight),
        InputKey::Home => Some(Message::CursorHome),
        InputKey::End => Some(Message::CursorEnd),
        InputKey::Char('q') => Some(Message::Quit),
        _ => None,
    }
}

fn handle_key_editor(key: InputKey) -> Option<Message> {
    match key {
        // Rows
        InputKey::Char('a') | InputKey::Char('+') => Some(Message::AddRow),
        InputKey::Char('d') | InputKey::Delete => Some(Message::RemoveRow),
        InputKey::Char('K') => Some(Message::MoveUp),
        InputKey::Char('J') => Some(Message::MoveDown),

        // Runs
        InputKey::Char('r') => Some(Message::StartRow { singleshot: false }),
        InputKey::Char('o') => Some(Message::StartRow { singleshot: true }),
        InputKey::Char('x') => Some(Message::StopRow),

        // Export
        InputKey::Char('w') | InputKey::CharCtrl('s') => Some(Message::SaveNow),

        // Editing
        InputKey::Enter | InputKey::Char('e') => Some(Message::BeginEdit),
        InputKey::Tab | InputKey::BackTab => Some(Message::ToggleFocus),

        _ => handle_key_navigation(key),
    }
}

fn handle_key_log_viewer(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('d') | InputKey::Delete => Some(Message::DeleteTest),
        _ => handle_key_navigation(key),
    }
}
