//! Port panel widget
//!
//! One line per configured port id with its current value. The entry under
//! the port cursor is highlighted while the panel has focus.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, StatefulWidget, Widget},
};

use labtable_app::state::{AppState, EditTarget, Focus, UiMode};

use crate::theme::styles;

pub struct PortList<'a> {
    state: &'a AppState,
}

impl<'a> PortList<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn focused(&self) -> bool {
        self.state.focus == Focus::Ports
    }

    fn item(&self, index: usize, id: &str, value: &str) -> ListItem<'static> {
        let editing = match &self.state.mode {
            UiMode::Editing {
                target: EditTarget::Port { index: i },
                buffer,
            } if *i == index => Some(buffer.as_str()),
            _ => None,
        };

        let value_span = match editing {
            Some(buffer) => Span::styled(format!("{buffer}▏"), styles::editing()),
            None if self.focused() && index == self.state.port_cursor => {
                Span::styled(value.to_string(), styles::focused_selected())
            }
            None => Span::styled(value.to_string(), styles::text_primary()),
        };

        ListItem::new(Line::from(vec![
            Span::styled(format!("{id}: "), styles::text_secondary()),
            value_span,
        ]))
    }
}

impl Widget for PortList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(self.focused())
            .title(Line::from(" Ports ").style(styles::accent()));

        let ports = self.state.ports.entries();
        if ports.is_empty() {
            let inner = block.inner(area);
            block.render(area, buf);
            if inner.height > 0 {
                buf.set_line(
                    inner.x,
                    inner.y,
                    &Line::from(" No ports configured").style(styles::text_muted()),
                    inner.width,
                );
            }
            return;
        }

        let items: Vec<ListItem> = ports
            .iter()
            .enumerate()
            .map(|(i, (id, value))| self.item(i, id, value))
            .collect();

        let mut list_state = ListState::default().with_selected(Some(self.state.port_cursor));
        StatefulWidget::render(List::new(items).block(block), area, buf, &mut list_state);
    }
}
