//! Header bar widget
//!
//! Shows the app title, which table is open, where it is stored, and the
//! push channel status.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use labtable_app::state::{AppState, TableKind};

use crate::theme::{palette, styles};

/// Main header: title and table on the left, push status on the right
pub struct MainHeader<'a> {
    state: &'a AppState,
}

impl<'a> MainHeader<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn table_label(&self) -> String {
        match self.state.kind {
            TableKind::Editor => "Test Editor".to_string(),
            TableKind::LogViewer { date } => format!("Test Log {date}"),
        }
    }
}

impl Widget for MainHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let left_line = Line::from(vec![
            Span::raw(" "),
            Span::styled(
                "labtable",
                Style::default()
                    .fg(palette::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled("/", styles::text_muted()),
            Span::raw(" "),
            Span::styled(self.table_label(), styles::text_secondary()),
            Span::raw("  "),
            Span::styled(self.state.backend_label.as_str(), styles::text_muted()),
        ]);
        let left_width = left_line.width() as u16;

        let (icon, label, style) = styles::push_indicator(&self.state.push_status);
        let right_line = Line::from(vec![
            Span::styled(icon, style),
            Span::raw(" "),
            Span::styled(label, style),
            Span::raw(" "),
        ]);
        let right_width = right_line.width() as u16;

        buf.set_line(inner.x, inner.y, &left_line, inner.width);

        // Right-align the push status when it fits
        if left_width + right_width + 2 <= inner.width {
            let right_x = inner.x + inner.width - right_width;
            buf.set_line(right_x, inner.y, &right_line, right_width);
        }
    }
}
