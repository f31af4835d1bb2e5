//! Semantic style builders.

use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

use labtable_app::state::{FlashKind, PushStatus};
use labtable_core::Row;

use super::palette;

// --- Text styles ---
pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

// --- Border styles ---
pub fn border_inactive() -> Style {
    Style::default().fg(palette::BORDER_DIM)
}

pub fn border_active() -> Style {
    Style::default().fg(palette::BORDER_ACTIVE)
}

// --- Accent styles ---
pub fn accent() -> Style {
    Style::default().fg(palette::ACCENT)
}

pub fn accent_bold() -> Style {
    Style::default()
        .fg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn keybinding() -> Style {
    Style::default().fg(palette::STATUS_YELLOW)
}

/// "Black on Cyan" - used for the focused cell and port
pub fn focused_selected() -> Style {
    Style::default()
        .fg(palette::CONTRAST_FG)
        .bg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Inline text input
pub fn editing() -> Style {
    Style::default()
        .fg(palette::TEXT_BRIGHT)
        .bg(palette::POPUP_BG)
        .add_modifier(Modifier::UNDERLINED)
}

// --- Block builders ---
pub fn glass_block(focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            border_active()
        } else {
            border_inactive()
        })
        .style(Style::default().bg(palette::CARD_BG))
}

pub fn modal_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_active())
        .style(Style::default().bg(palette::POPUP_BG))
}

// --- State mappings ---

/// Base style of a table row.
///
/// Running rows are green; the row currently streaming data is bold yellow.
pub fn row_style(row: &Row) -> Style {
    if row.active {
        Style::default()
            .fg(palette::STATUS_YELLOW)
            .add_modifier(Modifier::BOLD)
    } else if row.is_running() {
        Style::default().fg(palette::STATUS_GREEN)
    } else {
        text_primary()
    }
}

/// Glyph shown in front of a row: streaming, running, single-shot or idle.
pub fn run_indicator(row: &Row) -> &'static str {
    if row.active {
        "◉"
    } else if row.is_singleshot() {
        "◐"
    } else if row.is_running() {
        "●"
    } else {
        "○"
    }
}

pub fn flash(kind: FlashKind) -> Style {
    match kind {
        FlashKind::Info => Style::default().fg(palette::STATUS_GREEN),
        FlashKind::Error => Style::default()
            .fg(palette::STATUS_RED)
            .add_modifier(Modifier::BOLD),
    }
}

/// Push channel indicator for the header.
///
/// Returns `(icon, label, Style)`.
pub fn push_indicator(status: &PushStatus) -> (&'static str, String, Style) {
    match status {
        PushStatus::Off => ("○", "live off".to_string(), text_muted()),
        PushStatus::Connecting => (
            "◌",
            "connecting".to_string(),
            Style::default().fg(palette::STATUS_YELLOW),
        ),
        PushStatus::Connected => (
            "●",
            "live".to_string(),
            Style::default()
                .fg(palette::STATUS_GREEN)
                .add_modifier(Modifier::BOLD),
        ),
        PushStatus::Reconnecting {
            attempt,
            max_attempts,
        } => (
            "↻",
            format!("reconnecting {attempt}/{max_attempts}"),
            Style::default().fg(palette::STATUS_YELLOW),
        ),
        PushStatus::Lost => (
            "✗",
            "live lost".to_string(),
            Style::default()
                .fg(palette::STATUS_RED)
                .add_modifier(Modifier::BOLD),
        ),
    }
}
