//! Application state (Model in TEA pattern)

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde_json::Value;

use labtable_core::{FieldSchema, LogDate, Row};

use crate::config::Settings;
use crate::sync::PortPanel;
use crate::table::TestTable;

/// Lifecycle phase of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    /// Waiting for the initial table load
    #[default]
    Loading,
    /// Table loaded (or load failed); operator input accepted
    Ready,
    Quitting,
}

/// Which table the session shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Editable test table backed by `/table_load` and `/table_save`
    Editor,
    /// Read-only log of one day
    LogViewer { date: LogDate },
}

/// Pane holding keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Table,
    Ports,
}

/// What an edit buffer will be committed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Cell { row: usize, column: usize },
    Port { index: usize },
}

/// Current UI mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UiMode {
    #[default]
    Normal,
    /// Inline text input
    Editing { target: EditTarget, buffer: String },
    /// Modal message; any key dismisses
    Alert { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Info,
    Error,
}

/// Transient status message in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub text: String,
    pub kind: FlashKind,
    pub until: Instant,
}

/// Push channel status for the header
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PushStatus {
    /// Not subscribed (disabled, or log viewer)
    #[default]
    Off,
    Connecting,
    Connected,
    Reconnecting {
        attempt: u32,
        max_attempts: u32,
    },
    /// Gave up; no more live updates this session
    Lost,
}

/// Table selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub row: usize,
    pub column: usize,
}

/// Complete application state
#[derive(Debug)]
pub struct AppState {
    pub phase: AppPhase,
    pub kind: TableKind,
    pub settings: Settings,

    // ─────────────────────────────────────────────────────────
    // Table data
    // ─────────────────────────────────────────────────────────
    pub table: TestTable,
    pub ports: PortPanel,
    /// Top-level document keys kept from the last load
    pub extra: BTreeMap<String, Value>,

    // ─────────────────────────────────────────────────────────
    // UI
    // ─────────────────────────────────────────────────────────
    pub cursor: Cursor,
    pub focus: Focus,
    pub port_cursor: usize,
    pub mode: UiMode,
    pub flash: Option<Flash>,

    // ─────────────────────────────────────────────────────────
    // Connections
    // ─────────────────────────────────────────────────────────
    pub push_status: PushStatus,
    /// Where the table lives, shown in the header
    pub backend_label: String,
    /// Sequence number of the last save issued
    pub save_seq: u64,
}

impl AppState {
    /// State for the test editor.
    pub fn editor(settings: Settings, backend_label: impl Into<String>) -> Self {
        let table = TestTable::new(FieldSchema::editor(&settings.table.fields));
        Self::with_table(TableKind::Editor, table, settings, backend_label.into())
    }

    /// State for the read-only log viewer of `date`.
    pub fn log_viewer(settings: Settings, date: LogDate, backend_label: impl Into<String>) -> Self {
        let table = TestTable::read_only(FieldSchema::log_viewer(&settings.table.log_fields));
        Self::with_table(
            TableKind::LogViewer { date },
            table,
            settings,
            backend_label.into(),
        )
    }

    fn with_table(
        kind: TableKind,
        table: TestTable,
        settings: Settings,
        backend_label: String,
    ) -> Self {
        let ports = match kind {
            TableKind::Editor => PortPanel::from_ids(&settings.table.ports),
            TableKind::LogViewer { .. } => PortPanel::default(),
        };
        Self {
            phase: AppPhase::Loading,
            kind,
            settings,
            table,
            ports,
            extra: BTreeMap::new(),
            cursor: Cursor::default(),
            focus: Focus::Table,
            port_cursor: 0,
            mode: UiMode::Normal,
            flash: None,
            push_status: PushStatus::Off,
            backend_label,
            save_seq: 0,
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self.kind, TableKind::LogViewer { .. })
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    /// Socket.IO server to subscribe to, if live updates apply.
    pub fn push_server(&self) -> Option<String> {
        if self.is_read_only() || !self.settings.push.enabled {
            return None;
        }
        Some(
            self.settings
                .push
                .url
                .clone()
                .unwrap_or_else(|| self.settings.backend.url.clone()),
        )
    }

    /// Row under the cursor.
    pub fn selected_row(&self) -> Option<&Row> {
        self.table.row(self.cursor.row)
    }

    /// Keep the cursors inside the table and port panel after rows or
    /// ports change.
    pub fn clamp_cursor(&mut self) {
        self.cursor.row = self.cursor.row.min(self.table.len().saturating_sub(1));
        self.cursor.column = self
            .cursor
            .column
            .min(self.table.schema().named_len().saturating_sub(1));
        self.port_cursor = self.port_cursor.min(self.ports.len().saturating_sub(1));
    }

    /// Allocate the sequence number of the next save.
    pub fn next_save_seq(&mut self) -> u64 {
        self.save_seq += 1;
        self.save_seq
    }

    // ─────────────────────────────────────────────────────────
    // Flash and alert helpers
    // ─────────────────────────────────────────────────────────

    fn flash_duration(&self) -> Duration {
        self.settings.ui.flash_duration()
    }

    pub fn flash_info(&mut self, text: impl Into<String>) {
        self.flash = Some(Flash {
            text: text.into(),
            kind: FlashKind::Info,
            until: Instant::now() + self.flash_duration(),
        });
    }

    pub fn flash_error(&mut self, text: impl Into<String>) {
        // Errors stay up a little longer than confirmations
        self.flash = Some(Flash {
            text: text.into(),
            kind: FlashKind::Error,
            until: Instant::now() + self.flash_duration() * 3,
        });
    }

    /// Drop the flash once it has expired.
    pub fn expire_flash(&mut self, now: Instant) {
        if self.flash.as_ref().is_some_and(|f| now >= f.until) {
            self.flash = None;
        }
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.mode = UiMode::Alert {
            message: message.into(),
        };
    }
}
