//! Status bar widget
//!
//! Shows the current flash message (or key hints when there is none) on the
//! left, and the run count and cursor position on the right.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use labtable_app::state::{AppPhase, AppState, Focus, UiMode};

use crate::theme::{palette, styles};

/// Status bar widget showing flashes, hints and table position
pub struct StatusBar<'a> {
    state: &'a AppState,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// `(key, action)` pairs valid in the current mode
    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        if self.state.phase == AppPhase::Loading {
            return &[("q", "quit")];
        }
        match (&self.state.mode, self.state.focus) {
            (UiMode::Alert { .. }, _) => &[("any key", "dismiss")],
            (UiMode::Editing { .. }, _) => &[("Enter", "commit"), ("Esc", "cancel")],
            _ if self.state.is_read_only() => &[("↑↓", "select"), ("d", "delete"), ("q", "quit")],
            (UiMode::Normal, Focus::Ports) => &[
                ("↑↓", "select"),
                ("e", "edit"),
                ("w", "save"),
                ("Tab", "table"),
                ("q", "quit"),
            ],
            (UiMode::Normal, Focus::Table) => &[
                ("a", "add"),
                ("d", "remove"),
                ("K/J", "move"),
                ("r", "run"),
                ("o", "single"),
                ("x", "stop"),
                ("e", "edit"),
                ("w", "save"),
                ("Tab", "ports"),
                ("q", "quit"),
            ],
        }
    }

    fn left_spans(&self) -> Vec<Span<'static>> {
        if let Some(flash) = &self.state.flash {
            return vec![
                Span::raw(" "),
                Span::styled(flash.text.clone(), styles::flash(flash.kind)),
            ];
        }

        let mut spans = vec![Span::raw(" ")];
        for (key, action) in self.hints() {
            spans.push(Span::styled(*key, styles::keybinding()));
            spans.push(Span::styled(format!(" {action}  "), styles::text_muted()));
        }
        spans
    }

    fn right_spans(&self) -> Vec<Span<'static>> {
        let table = &self.state.table;
        let running = table.rows().iter().filter(|r| r.is_running()).count();
        let separator = Span::styled(" │ ", Style::default().fg(palette::TEXT_MUTED));

        let mut spans = Vec::new();
        if running > 0 {
            spans.push(Span::styled(
                format!("● {running} running"),
                Style::default().fg(palette::STATUS_GREEN),
            ));
            spans.push(separator);
        }
        let position = if table.is_empty() {
            "0/0".to_string()
        } else {
            format!("{}/{}", self.state.cursor.row + 1, table.len())
        };
        spans.push(Span::styled(position, styles::text_secondary()));
        spans.push(Span::raw(" "));
        spans
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        buf.set_style(area, Style::default().bg(palette::DEEPEST_BG));

        let right = Line::from(self.right_spans());
        let right_width = right.width() as u16;
        let left = Line::from(self.left_spans());

        let left_width = area.width.saturating_sub(right_width + 1);
        buf.set_line(area.x, area.y, &left, left_width);
        if right_width <= area.width {
            buf.set_line(area.x + area.width - right_width, area.y, &right, right_width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ready_editor, ready_log_viewer, started_at, TestTerminal};

    #[test]
    fn test_editor_hints_when_no_flash() {
        let mut term = TestTerminal::with_size(120, 1);
        let state = ready_editor(0);

        term.render_widget(StatusBar::new(&state), term.area());

        assert!(term.buffer_contains("a add"));
        assert!(term.buffer_contains("x stop"));
        assert!(term.buffer_contains("0/0"));
    }

    #[test]
    fn test_flash_replaces_hints() {
        let mut term = TestTerminal::with_size(120, 1);
        let mut state = ready_editor(1);
        state.flash_info("success!");

        term.render_widget(StatusBar::new(&state), term.area());

        assert!(term.buffer_contains("success!"));
        assert!(!term.buffer_contains("a add"));
    }

    #[test]
    fn test_running_count_and_position() {
        let mut term = TestTerminal::with_size(120, 1);
        let mut state = ready_editor(3);
        state.table.start(1, started_at(), false).unwrap();
        state.cursor.row = 1;

        term.render_widget(StatusBar::new(&state), term.area());

        assert!(term.buffer_contains("1 running"));
        assert!(term.buffer_contains("2/3"));
    }

    #[test]
    fn test_log_viewer_hints() {
        let mut term = TestTerminal::with_size(120, 1);
        let state = ready_log_viewer();

        term.render_widget(StatusBar::new(&state), term.area());

        assert!(term.buffer_contains("d delete"));
        assert!(!term.buffer_contains("a add"));
    }

    #[test]
    fn test_editing_hints() {
        let mut term = TestTerminal::with_size(120, 1);
        let mut state = ready_editor(1);
        state.mode = UiMode::Editing {
            target: labtable_app::state::EditTarget::Cell { row: 0, column: 3 },
            buffer: String::new(),
        };

        term.render_widget(StatusBar::new(&state), term.area());

        assert!(term.buffer_contains("Enter commit"));
    }
}
