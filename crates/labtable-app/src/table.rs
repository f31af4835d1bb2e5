//! The test table: ordered rows, the test id counter, and the row lifecycle
//!
//! Covers both the table operations (add, remove, reorder, edit) and the
//! run operations (start, single-shot start, stop) plus the two push event
//! effects (active marker, waveform update).

use chrono::{NaiveDateTime, Timelike};

use labtable_core::prelude::*;
use labtable_core::{FieldSchema, Row, RowId, RowTemplate, Waveform};

/// What an `update` push event did to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Index of the row that received the samples
    pub index: usize,
    /// The row was single-shot and has been stopped
    pub auto_stopped: bool,
}

/// Rows of one table plus the schema and template they were built from.
#[derive(Debug, Clone)]
pub struct TestTable {
    schema: FieldSchema,
    template: RowTemplate,
    rows: Vec<Row>,
    /// Last test id handed out; advanced by one per successful start
    last_tid: RowId,
}

impl TestTable {
    /// Editable table (test editor).
    pub fn new(schema: FieldSchema) -> Self {
        let template = RowTemplate::new(&schema);
        Self {
            schema,
            template,
            rows: Vec::new(),
            last_tid: 0,
        }
    }

    /// Table whose cells are never editable (log viewer).
    pub fn read_only(schema: FieldSchema) -> Self {
        let template = RowTemplate::read_only(&schema);
        Self {
            schema,
            template,
            rows: Vec::new(),
            last_tid: 0,
        }
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn template(&self) -> &RowTemplate {
        &self.template
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last_tid(&self) -> RowId {
        self.last_tid
    }

    /// Replace every row and the counter, e.g. after a load.
    /// Swap in loaded rows. The counter never falls behind an id already
    /// present in the table.
    pub fn replace(&mut self, rows: Vec<Row>, last_tid: RowId) {
        let highest = rows.iter().filter_map(|row| row.rowid).max().unwrap_or(0);
        self.rows = rows;
        self.last_tid = last_tid.max(highest);
    }

    // ─────────────────────────────────────────────────────────
    // Table operations
    // ─────────────────────────────────────────────────────────

    /// Append a freshly stamped row. Returns its index.
    pub fn add_row(&mut self) -> usize {
        self.rows.push(self.template.stamp());
        self.rows.len() - 1
    }

    pub fn remove_row(&mut self, index: usize) -> Result<Row> {
        if index >= self.rows.len() {
            return Err(Error::RowNotFound { index });
        }
        Ok(self.rows.remove(index))
    }

    /// Remove the row carrying `rowid`, if any.
    pub fn remove_by_rowid(&mut self, rowid: RowId) -> Option<Row> {
        let index = self.find_by_rowid(rowid)?;
        Some(self.rows.remove(index))
    }

    /// Swap with the previous row. `false` at the top boundary.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.rows.len() {
            return false;
        }
        self.rows.swap(index - 1, index);
        true
    }

    /// Swap with the next row. `false` at the bottom boundary.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.rows.len() {
            return false;
        }
        self.rows.swap(index, index + 1);
        true
    }

    pub fn cell_editable(&self, index: usize, column: usize) -> bool {
        self.rows
            .get(index)
            .is_some_and(|row| self.template.cell_editable(row, column))
    }

    /// Commit a cell value, honoring the row's editability.
    pub fn edit_cell(&mut self, index: usize, column: usize, value: String) -> Result<()> {
        let row = self
            .rows
            .get_mut(index)
            .ok_or(Error::RowNotFound { index })?;
        if !self.template.cell_editable(row, column) {
            let name = self.schema.fields().get(column).cloned().unwrap_or_default();
            return Err(Error::cell_locked(name));
        }
        row.set_cell(column, value);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Run operations
    // ─────────────────────────────────────────────────────────

    /// Start a run on the row at `index`.
    ///
    /// Assigns `last_tid + 1` and advances the counter only on success.
    /// A running row is rejected with [`Error::RowRunning`] and left as is.
    pub fn start(&mut self, index: usize, now: NaiveDateTime, singleshot: bool) -> Result<RowId> {
        let row = self
            .rows
            .get_mut(index)
            .ok_or(Error::RowNotFound { index })?;

        let current = self
            .last_tid
            .checked_add(1)
            .ok_or(Error::CounterExhausted {
                last_tid: self.last_tid,
            })?;
        let started = now.with_nanosecond(0).unwrap_or(now);
        row.start(&self.schema, current, started, singleshot)?;
        self.last_tid = current;

        info!(
            "Started test {} on row {}{}",
            current,
            index,
            if singleshot { " (single shot)" } else { "" }
        );
        Ok(current)
    }

    /// Stop the row at `index`. `Ok(false)` if it was idle.
    pub fn stop(&mut self, index: usize) -> Result<bool> {
        let row = self
            .rows
            .get_mut(index)
            .ok_or(Error::RowNotFound { index })?;
        let stopped = row.stop();
        if stopped {
            info!("Stopped test {:?} on row {}", row.rowid, index);
        }
        Ok(stopped)
    }

    // ─────────────────────────────────────────────────────────
    // Push event effects
    // ─────────────────────────────────────────────────────────

    pub fn find_by_rowid(&self, rowid: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.rowid == Some(rowid))
    }

    /// Clear every active marker, then mark the row carrying `rowid`.
    ///
    /// Returns the index of the newly active row, if one matched.
    pub fn set_active(&mut self, rowid: Option<RowId>) -> Option<usize> {
        for row in &mut self.rows {
            row.active = false;
        }
        let index = self.find_by_rowid(rowid?)?;
        self.rows[index].active = true;
        Some(index)
    }

    /// Apply an `update` event: auto-stop a single-shot row, then replace
    /// its waveform.
    ///
    /// Returns `None` when no row carries `rowid`.
    pub fn apply_update(&mut self, rowid: Option<RowId>, amp: Vec<f64>) -> Option<UpdateOutcome> {
        let index = self.find_by_rowid(rowid?)?;
        let row = &mut self.rows[index];

        let auto_stopped = row.is_singleshot() && row.stop();
        row.waveform = Some(Waveform::new(amp));

        Some(UpdateOutcome {
            index,
            auto_stopped,
        })
    }
}
