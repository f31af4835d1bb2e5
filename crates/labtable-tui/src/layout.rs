//! Screen layout definitions for the TUI
//!
//! The editor shows the table with the port panel on its right; the log
//! viewer gives the table the full width. Both keep a waveform pane under
//! the table and a one-line status bar at the bottom.

use ratatui::layout::{Constraint, Layout, Rect};

/// Top border + title row + bottom border
pub const HEADER_HEIGHT: u16 = 3;

/// Borders plus four rows of sparkline
pub const WAVEFORM_HEIGHT: u16 = 6;

pub const PORT_PANEL_WIDTH: u16 = 28;

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// Title, table kind, backend and push status
    pub header: Rect,

    pub table: Rect,

    /// Waveform of the selected row
    pub waveform: Rect,

    /// Port panel, editor only
    pub ports: Option<Rect>,

    /// Flash messages and key hints
    pub status: Rect,
}

/// Create the main screen layout
///
/// # Arguments
/// * `area` - Total screen area
/// * `show_ports` - Whether the port panel gets a column
pub fn create(area: Rect, show_ports: bool) -> ScreenAreas {
    let [header, body, waveform, status] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(3),
        Constraint::Length(WAVEFORM_HEIGHT),
        Constraint::Length(1),
    ])
    .areas(area);

    let (table, ports) = if show_ports {
        let [table, ports] =
            Layout::horizontal([Constraint::Min(20), Constraint::Length(PORT_PANEL_WIDTH)])
                .areas(body);
        (table, Some(ports))
    } else {
        (body, None)
    };

    ScreenAreas {
        header,
        table,
        waveform,
        ports,
        status,
    }
}
