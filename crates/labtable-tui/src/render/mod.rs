//! Main render/view function (View in TEA pattern)


use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

use labtable_app::state::{AppState, UiMode};

use super::{layout, widgets};
use crate::theme::palette;

/// Render the complete UI (View function in TEA)
///
/// Pure with respect to `state`; scroll positions are derived from the
/// cursors on every frame.
pub fn view(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Fill entire terminal with deepest background color
    frame.render_widget(
        Block::default().style(Style::default().bg(palette::DEEPEST_BG)),
        area,
    );

    let areas = layout::create(area, !state.is_read_only());

    frame.render_widget(widgets::MainHeader::new(state), areas.header);
    frame.render_widget(widgets::TableView::new(state), areas.table);
    frame.render_widget(
        widgets::WaveformPane::new(state.selected_row()),
        areas.waveform,
    );
    if let Some(ports_area) = areas.ports {
        frame.render_widget(widgets::PortList::new(state), ports_area);
    }
    frame.render_widget(widgets::StatusBar::new(state), areas.status);

    // Modal overlays render last
    if let UiMode::Alert { message } = &state.mode {
        frame.render_widget(widgets::AlertModal::new(message), area);
    }
}
