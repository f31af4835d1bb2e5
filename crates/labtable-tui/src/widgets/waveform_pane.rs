//! Waveform pane
//!
//! Full-width sparkline of the last waveform received for the selected row.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Sparkline, Widget},
};

use labtable_core::Row;

use crate::theme::{palette, styles};

/// Resolution of the sparkline bars
const MAX_LEVEL: u64 = 100;

pub struct WaveformPane<'a> {
    row: Option<&'a Row>,
}

impl<'a> WaveformPane<'a> {
    pub fn new(row: Option<&'a Row>) -> Self {
        Self { row }
    }

    fn title(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(" Waveform ", styles::accent())];
        let Some(row) = self.row else {
            return Line::from(spans);
        };
        if let Some(rowid) = row.rowid {
            spans.push(Span::styled(format!("test {rowid} "), styles::text_secondary()));
        }
        if let Some((min, max)) = row.waveform.as_ref().and_then(|w| w.range()) {
            spans.push(Span::styled(
                format!("[{min:.3} .. {max:.3}] "),
                styles::text_muted(),
            ));
        }
        Line::from(spans)
    }
}

impl Widget for WaveformPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).title(self.title());
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let waveform = self
            .row
            .and_then(|row| row.waveform.as_ref())
            .filter(|w| !w.is_empty());

        match waveform {
            Some(waveform) => {
                let data = waveform.levels(usize::from(inner.width), MAX_LEVEL);
                Sparkline::default()
                    .data(data)
                    .max(MAX_LEVEL)
                    .style(Style::default().fg(palette::SPARKLINE))
                    .render(inner, buf);
            }
            None => {
                let y = inner.y + inner.height / 2;
                Paragraph::new(Line::from("No waveform received").style(styles::text_muted()))
                    .alignment(Alignment::Center)
                    .render(Rect::new(inner.x, y, inner.width, 1), buf);
            }
        }
    }
}
