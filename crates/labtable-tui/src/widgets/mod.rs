//! Widget components for the TUI

pub mod alert;
pub mod header;
pub mod modal_overlay;
pub mod port_panel;
pub mod status_bar;
pub mod table_view;
pub mod waveform_pane;

pub use alert::AlertModal;
pub use header::MainHeader;
pub use port_panel::PortList;
pub use status_bar::StatusBar;
pub use table_view::TableView;
pub use waveform_pane::WaveformPane;
