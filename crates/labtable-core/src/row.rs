//! Table rows, their run state, and the template every new row is stamped from

use chrono::NaiveDateTime;

use crate::error::{Error, Result};
use crate::schema::{ColumnRole, FieldSchema};
use crate::waveform::Waveform;

/// Test identifier assigned when a run starts.
pub type RowId = u64;

/// Format of the start date cell, e.g. `Oct 19 2026 14:03:22`.
pub const START_DATE_FORMAT: &str = "%b %d %Y %H:%M:%S";

/// Run state of one row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running {
        /// When the run started; `None` if the persisted date did not parse
        since: Option<NaiveDateTime>,
        /// Stop automatically after the first waveform update
        singleshot: bool,
    },
}

impl RunState {
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running { .. })
    }

    pub fn is_singleshot(&self) -> bool {
        matches!(
            self,
            RunState::Running {
                singleshot: true,
                ..
            }
        )
    }

    /// Wire form of the run flag.
    pub fn flag(&self) -> &'static str {
        if self.is_running() {
            "y"
        } else {
            "n"
        }
    }
}

/// One test configuration in the table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    /// One value per named schema field
    cells: Vec<String>,
    pub rowid: Option<RowId>,
    pub state: RunState,
    /// Currently streaming data
    pub active: bool,
    pub waveform: Option<Waveform>,
}

impl Row {
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Overwrite a cell without any editability check.
    ///
    /// Out-of-range columns are ignored.
    pub fn set_cell(&mut self, column: usize, value: impl Into<String>) {
        if let Some(cell) = self.cells.get_mut(column) {
            *cell = value.into();
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn is_singleshot(&self) -> bool {
        self.state.is_singleshot()
    }

    /// Transition idle → running.
    ///
    /// Stamps the start date and test id cells, assigns `rowid` and clears
    /// `active`. A running row is left untouched and [`Error::RowRunning`] is
    /// returned.
    pub fn start(
        &mut self,
        schema: &FieldSchema,
        rowid: RowId,
        started: NaiveDateTime,
        singleshot: bool,
    ) -> Result<()> {
        if self.is_running() {
            return Err(Error::RowRunning);
        }

        if let Some(col) = schema.column_of(ColumnRole::StartDate) {
            self.set_cell(col, started.format(START_DATE_FORMAT).to_string());
        }
        if let Some(col) = schema.column_of(ColumnRole::TestId) {
            self.set_cell(col, rowid.to_string());
        }

        self.rowid = Some(rowid);
        self.active = false;
        self.state = RunState::Running {
            since: Some(started),
            singleshot,
        };
        Ok(())
    }

    /// Transition running → idle. Returns `false` if the row was already idle.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = RunState::Idle;
        true
    }
}

/// Prototype row matching a schema ("cloner").
///
/// Holds the per-column editability mask. Control slots and the fixed
/// leading columns (start date, test id, waveform, run flag) are never
/// editable; data columns are editable while the row is idle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowTemplate {
    editable: Vec<bool>,
    named: usize,
}

impl RowTemplate {
    pub fn new(schema: &FieldSchema) -> Self {
        let editable = (0..schema.len())
            .map(|i| schema.role(i).is_data())
            .collect();
        Self {
            editable,
            named: schema.named_len(),
        }
    }

    /// Read-only template: nothing is editable regardless of state.
    pub fn read_only(schema: &FieldSchema) -> Self {
        Self {
            editable: vec![false; schema.len()],
            named: schema.named_len(),
        }
    }

    /// Cell count of a stamped row, control slots included.
    pub fn width(&self) -> usize {
        self.editable.len()
    }

    /// A new empty, idle, editable row.
    pub fn stamp(&self) -> Row {
        Row {
            cells: vec![String::new(); self.named],
            ..Row::default()
        }
    }

    pub fn cell_editable(&self, row: &Row, column: usize) -> bool {
        !row.is_running() && self.editable.get(column).copied().unwrap_or(false)
    }

    /// Editability of every column of `row`, control slots included.
    pub fn editable_mask(&self, row: &Row) -> Vec<bool> {
        (0..self.width())
            .map(|col| self.cell_editable(row, col))
            .collect()
    }
}
