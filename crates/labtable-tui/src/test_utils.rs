//! Test utilities for TUI rendering verification
//!
//! Provides helpers for testing widgets and full-screen rendering using
//! ratatui's TestBackend, plus builders for the states the tests render.

use chrono::NaiveDate;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use ratatui::{Frame, Terminal};

use labtable_app::config::Settings;
use labtable_app::state::{AppPhase, AppState};
use labtable_core::LogDate;

/// Standard test terminal size
pub const TEST_WIDTH: u16 = 120;
pub const TEST_HEIGHT: u16 = 30;

/// Test utility wrapper around ratatui's TestBackend terminal.
pub struct TestTerminal {
    pub terminal: Terminal<TestBackend>,
}

impl TestTerminal {
    /// Create a new test terminal with standard dimensions (120x30)
    pub fn new() -> Self {
        Self::with_size(TEST_WIDTH, TEST_HEIGHT)
    }

    pub fn with_size(width: u16, height: u16) -> Self {
        let backend = TestBackend::new(width, height);
        let terminal = Terminal::new(backend).expect("Failed to create test terminal");
        Self { terminal }
    }

    pub fn area(&self) -> Rect {
        let size = self.terminal.size().expect("Failed to get terminal size");
        Rect::new(0, 0, size.width, size.height)
    }

    /// Render a widget to the terminal
    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        self.terminal
            .draw(|frame| frame.render_widget(widget, area))
            .expect("Failed to render widget");
    }

    /// Draws a full frame, e.g. with `render::view`
    pub fn draw_with<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f).expect("Failed to draw frame");
    }

    pub fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }

    /// Check if the buffer contains a string anywhere
    pub fn buffer_contains(&self, text: &str) -> bool {
        buffer_to_string(self.buffer()).contains(text)
    }

    /// Check if a specific line contains text
    pub fn line_contains(&self, line: u16, text: &str) -> bool {
        get_line_content(self.buffer(), line).contains(text)
    }

    /// Row index of the first line containing `text`
    pub fn find_line(&self, text: &str) -> Option<u16> {
        let buffer = self.buffer();
        (0..buffer.area.height).find(|&y| get_line_content(buffer, y).contains(text))
    }

    /// Get all content as a string (for debugging)
    pub fn content(&self) -> String {
        buffer_to_string(self.buffer())
    }
}

impl Default for TestTerminal {
    fn default() -> Self {
        Self::new()
    }
}

fn buffer_to_string(buffer: &Buffer) -> String {
    let mut result = String::new();
    for y in 0..buffer.area.height {
        result.push_str(&get_line_content(buffer, y));
        result.push('\n');
    }
    result
}

fn get_line_content(buffer: &Buffer, line: u16) -> String {
    let mut result = String::new();
    if line < buffer.area.height {
        for x in 0..buffer.area.width {
            result.push_str(buffer[(x, line)].symbol());
        }
    }
    result
}

/// Editor with push disabled, loaded, holding `rows` empty rows
pub fn ready_editor(rows: usize) -> AppState {
    let mut settings = Settings::default();
    settings.push.enabled = false;
    let mut state = AppState::editor(settings, "memory");
    state.phase = AppPhase::Ready;
    for _ in 0..rows {
        state.table.add_row();
    }
    state
}

/// Loaded log viewer for 10/19/2026
pub fn ready_log_viewer() -> AppState {
    let date = LogDate::parse("10/19/2026").expect("valid date");
    let mut state = AppState::log_viewer(Settings::default(), date, "memory");
    state.phase = AppPhase::Ready;
    state
}

/// Start timestamp used by rendering tests
pub fn started_at() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .and_then(|d| d.and_hms_opt(14, 3, 22))
        .expect("valid timestamp")
}
