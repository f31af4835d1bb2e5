//! Test table widget
//!
//! Renders the named columns of the table with a run indicator in front of
//! every row. Waveform columns show an inline sparkline and the run flag
//! column mirrors the row's run state. When the columns do not fit, the
//! view scrolls horizontally to keep the cursor column visible.

use std::ops::Range;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Cell, Paragraph, Row as TableRow, StatefulWidget, Table, TableState, Widget},
};

use labtable_app::state::{AppPhase, AppState, EditTarget, Focus, UiMode};
use labtable_core::{ColumnRole, Row};

use crate::theme::{palette, styles};

/// Widest a column grows before its text is cut
const MAX_COLUMN_WIDTH: u16 = 24;
const MIN_COLUMN_WIDTH: u16 = 3;
const COLUMN_SPACING: u16 = 1;
/// Run indicator glyph plus padding
const INDICATOR_WIDTH: u16 = 2;

pub struct TableView<'a> {
    state: &'a AppState,
}

impl<'a> TableView<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn focused(&self) -> bool {
        self.state.focus == Focus::Table
    }

    fn sparkline_width(&self) -> usize {
        usize::from(self.state.settings.ui.sparkline_width)
    }

    /// Edit buffer if the operator is typing into this cell
    fn editing_buffer(&self, row: usize, column: usize) -> Option<&str> {
        match &self.state.mode {
            UiMode::Editing {
                target: EditTarget::Cell { row: r, column: c },
                buffer,
            } if *r == row && *c == column => Some(buffer.as_str()),
            _ => None,
        }
    }

    /// Display text of one cell.
    fn cell_text(&self, row: &Row, column: usize) -> String {
        match self.state.table.schema().role(column) {
            ColumnRole::Waveform => row
                .waveform
                .as_ref()
                .map(|w| w.sparkline(self.sparkline_width()))
                .unwrap_or_default(),
            ColumnRole::RunFlag => row.state.flag().to_string(),
            _ => row.cell(column).unwrap_or_default().to_string(),
        }
    }

    fn column_widths(&self) -> Vec<u16> {
        let schema = self.state.table.schema();
        let rows = self.state.table.rows();

        (0..schema.named_len())
            .map(|column| {
                let label = schema.fields()[column].chars().count();
                let content = match schema.role(column) {
                    ColumnRole::Waveform => self.sparkline_width(),
                    _ => rows
                        .iter()
                        .enumerate()
                        .map(|(i, row)| {
                            self.editing_buffer(i, column)
                                .map(|b| b.chars().count() + 1)
                                .unwrap_or_else(|| self.cell_text(row, column).chars().count())
                        })
                        .max()
                        .unwrap_or(0),
                };
                let width = u16::try_from(label.max(content)).unwrap_or(MAX_COLUMN_WIDTH);
                width.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
            })
            .collect()
    }

    fn render_placeholder(area: Rect, buf: &mut Buffer, text: &str) {
        if area.height == 0 {
            return;
        }
        let y = area.y + area.height / 2;
        Paragraph::new(Line::from(text).style(styles::text_muted()))
            .alignment(Alignment::Center)
            .render(Rect::new(area.x, y, area.width, 1), buf);
    }
}

/// Columns to draw so that `cursor` stays visible within `available` cells.
///
/// Scrolls only as far as needed: the cursor column becomes the last visible
/// one, and the range is then extended with whatever else fits.
pub fn visible_columns(widths: &[u16], cursor: usize, available: u16) -> Range<usize> {
    if widths.is_empty() {
        return 0..0;
    }
    let cursor = cursor.min(widths.len() - 1);
    let fits = |start: usize, end: usize| {
        let content: u32 = widths[start..=end].iter().map(|w| u32::from(*w)).sum();
        let spacing = u32::from(COLUMN_SPACING) * (end - start) as u32;
        content + spacing <= u32::from(available)
    };

    let mut start = 0;
    while start < cursor && !fits(start, cursor) {
        start += 1;
    }
    let mut end = start;
    while end + 1 < widths.len() && fits(start, end + 1) {
        end += 1;
    }
    start..end + 1
}

impl Widget for TableView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let table = &self.state.table;
        let title = format!(" Tests ({}) ", table.len());
        let block =
            styles::glass_block(self.focused()).title(Line::from(title).style(styles::accent()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.state.phase == AppPhase::Loading {
            Self::render_placeholder(inner, buf, "Loading table...");
            return;
        }
        if table.is_empty() {
            let hint = if self.state.is_read_only() {
                "No tests logged on this day"
            } else {
                "No tests. Press a to add a row"
            };
            Self::render_placeholder(inner, buf, hint);
            return;
        }

        let schema = table.schema();
        let cursor = self.state.cursor;
        let widths = self.column_widths();
        let available = inner.width.saturating_sub(INDICATOR_WIDTH + COLUMN_SPACING);
        let columns = visible_columns(&widths, cursor.column, available);

        let header = TableRow::new(
            std::iter::once(Cell::from(""))
                .chain(columns.clone().map(|c| Cell::from(schema.fields()[c].as_str()))),
        )
        .style(styles::accent_bold());

        let rows = table.rows().iter().enumerate().map(|(i, row)| {
            let indicator = Cell::from(styles::run_indicator(row));
            let cells = columns.clone().map(|column| {
                if let Some(buffer) = self.editing_buffer(i, column) {
                    return Cell::from(format!("{buffer}▏")).style(styles::editing());
                }
                let cell = Cell::from(self.cell_text(row, column));
                if i == cursor.row && column == cursor.column {
                    if self.focused() {
                        cell.style(styles::focused_selected())
                    } else {
                        cell.style(Style::default().add_modifier(Modifier::UNDERLINED))
                    }
                } else if schema.role(column) == ColumnRole::Waveform {
                    cell.style(Style::default().fg(palette::SPARKLINE))
                } else {
                    cell
                }
            });
            TableRow::new(std::iter::once(indicator).chain(cells)).style(styles::row_style(row))
        });

        let constraints: Vec<Constraint> = std::iter::once(Constraint::Length(INDICATOR_WIDTH))
            .chain(columns.clone().map(|c| Constraint::Length(widths[c])))
            .collect();

        let table_widget = Table::new(rows, constraints)
            .header(header)
            .column_spacing(COLUMN_SPACING)
            .row_highlight_style(Style::default().bg(palette::ROW_CURSOR_BG));

        let mut table_state = TableState::default().with_selected(Some(cursor.row));
        StatefulWidget::render(table_widget, inner, buf, &mut table_state);
    }
}
