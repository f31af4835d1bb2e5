//! Modal alert dialog
//!
//! Blocks the screen until the operator presses a key.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Clear, Paragraph, Widget, Wrap},
};

use crate::theme::styles;

use super::modal_overlay::{centered_rect, dim_background, render_shadow};

const ALERT_WIDTH: u16 = 56;
const ALERT_HEIGHT: u16 = 7;

pub struct AlertModal<'a> {
    message: &'a str,
}

impl<'a> AlertModal<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl Widget for AlertModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        dim_background(buf, area);

        let modal = centered_rect(ALERT_WIDTH, ALERT_HEIGHT, area);
        render_shadow(buf, modal);
        Clear.render(modal, buf);

        let block = styles::modal_block(" Alert ");
        let inner = block.inner(modal);
        block.render(modal, buf);

        let text = vec![
            Line::from(""),
            Line::from(self.message).style(styles::text_primary()),
            Line::from(""),
            Line::from("press any key").style(styles::text_muted()),
        ];
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;

    #[test]
    fn test_alert_shows_message_centered() {
        let mut term = TestTerminal::with_size(80, 24);

        term.render_widget(
            AlertModal::new("Please stop current test before starting a new one"),
            term.area(),
        );

        assert!(term.buffer_contains("Alert"));
        assert!(term.buffer_contains("Please stop current test before starting a new one"));
        assert!(term.buffer_contains("press any key"));
        assert!(term.find_line("Alert").unwrap() > 5);
    }
}
