//! Settings synchronization: table ↔ settings document
//!
//! A save serializes every row into a record keyed by the lower-cased field
//! name and wraps them, the port fields and `last_tid` into one document that
//! fully replaces the backend state. A load materializes every record back
//! into a row stamped from the table's template.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde_json::Value;

use labtable_core::prelude::*;
use labtable_core::{
    ColumnRole, FieldSchema, Row, RowRecord, RowTemplate, RunState, SettingsDocument, RUN_KEY,
    SINGLESHOT_KEY, START_DATE_FORMAT, TEST_ID_KEY,
};

use crate::table::TestTable;

/// Value written for an active single-shot marker.
const SINGLESHOT_MARKER: &str = "true";

/// Port fields shown in the side panel, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortPanel {
    entries: Vec<(String, String)>,
}

impl PortPanel {
    /// Panel with the configured port ids and empty values.
    pub fn from_ids(ids: &[String]) -> Self {
        let mut panel = Self::default();
        for id in ids {
            panel.set(id.clone(), String::new());
        }
        panel
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, v)| v.as_str())
    }

    /// Set a port value, appending unknown ids.
    pub fn set(&mut self, id: impl Into<String>, value: impl Into<String>) {
        let id = id.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((id, value)),
        }
    }

    /// Set the value of the port at `index`. `false` if out of range.
    pub fn set_at(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.1 = value.into();
                true
            }
            None => false,
        }
    }

    /// Fill values from a loaded document.
    ///
    /// Configured ports missing from the document keep their ids with an
    /// empty value; ports only the document knows are appended.
    pub fn adopt(&mut self, document: &SettingsDocument, suffix: &str) {
        for (_, value) in &mut self.entries {
            value.clear();
        }
        for (id, value) in document.ports(suffix) {
            self.set(id, value);
        }
    }
}

/// Serialize one row into its persisted record.
///
/// The run flag always comes from the run state, never from cell text, and
/// the single-shot marker is only written while such a run is active.
pub fn row_to_record(schema: &FieldSchema, row: &Row) -> RowRecord {
    let mut record = RowRecord::new();

    for (index, key) in schema.keys().into_iter().enumerate() {
        let value = match schema.role(index) {
            ColumnRole::RunFlag => row.state.flag().to_string(),
            _ => row.cell(index).unwrap_or_default().to_string(),
        };
        record.insert(key, value);
    }

    if schema.column_of(ColumnRole::RunFlag).is_none() {
        record.insert(RUN_KEY, row.state.flag());
    }
    if row.is_singleshot() {
        record.insert(SINGLESHOT_KEY, SINGLESHOT_MARKER);
    }

    record
}

/// Materialize a persisted record through the template.
///
/// Keys are matched case-insensitively; fields the record lacks stay empty.
/// A record persisted as running comes back locked, with its single-shot
/// marker restored.
pub fn record_to_row(schema: &FieldSchema, template: &RowTemplate, record: &RowRecord) -> Row {
    let mut row = template.stamp();

    for (index, key) in schema.keys().into_iter().enumerate() {
        if schema.role(index) == ColumnRole::RunFlag {
            continue;
        }
        if let Some(value) = record.get(&key) {
            row.set_cell(index, value);
        }
    }

    row.rowid = record
        .get(TEST_ID_KEY)
        .and_then(|id| id.trim().parse().ok());

    let running = record
        .get(RUN_KEY)
        .is_some_and(|flag| flag.trim().eq_ignore_ascii_case("y"));
    if running {
        let since = schema
            .column_of(ColumnRole::StartDate)
            .and_then(|col| row.cell(col))
            .and_then(parse_start_date);
        let singleshot = record
            .get(SINGLESHOT_KEY)
            .is_some_and(|marker| marker.trim().eq_ignore_ascii_case(SINGLESHOT_MARKER));
        row.state = RunState::Running { since, singleshot };
    }

    row
}

fn parse_start_date(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), START_DATE_FORMAT).ok()
}

/// Build the full replacement document for a save.
///
/// `extra` holds the top-level keys kept from the last load; port fields
/// from the panel override them.
pub fn to_document(
    table: &TestTable,
    ports: &PortPanel,
    extra: &BTreeMap<String, Value>,
) -> SettingsDocument {
    let mut document = SettingsDocument {
        last_tid: table.last_tid(),
        data: table
            .rows()
            .iter()
            .map(|row| row_to_record(table.schema(), row))
            .collect(),
        extra: extra.clone(),
    };
    for (id, value) in ports.entries() {
        document.set_port(id.clone(), value.clone());
    }
    document
}

/// Replace the table contents with a loaded document.
///
/// Returns the top-level keys that are neither ports nor owned by the
/// document type, to be written back on the next save.
pub fn materialize(
    document: SettingsDocument,
    table: &mut TestTable,
    ports: &mut PortPanel,
    port_suffix: &str,
) -> BTreeMap<String, Value> {
    ports.adopt(&document, port_suffix);

    let rows: Vec<Row> = document
        .data
        .iter()
        .map(|record| record_to_row(table.schema(), table.template(), record))
        .collect();
    let running = rows.iter().filter(|row| row.is_running()).count();
    debug!(
        "Materialized {} rows ({} running), last_tid {}",
        rows.len(),
        running,
        document.last_tid
    );
    table.replace(rows, document.last_tid);

    document
        .extra
        .into_iter()
        .filter(|(key, _)| !key.ends_with(port_suffix))
        .collect()
}
