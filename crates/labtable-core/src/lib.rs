//! # labtable-core - Core Domain Types
//!
//! Foundation crate for labtable. Provides the table's domain types, the
//! settings document wire format, push event definitions, error handling and
//! logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Schema (`schema`)
//! - [`FieldSchema`] - Normalized column list plus control slots
//! - [`ColumnRole`] - What a column is for (start date, test id, data...)
//!
//! ### Rows (`row`)
//! - [`Row`] - One test configuration with its run state
//! - [`RunState`] - `Idle` or `Running { since, singleshot }`
//! - [`RowTemplate`] - Prototype every new row is stamped from
//!
//! ### Settings (`document`)
//! - [`SettingsDocument`] - The whole table as persisted by the backend
//! - [`RowRecord`] - One persisted row, keyed by lower-cased field name
//! - [`SaveStatus`] - Status returned by a save
//!
//! ### Log Viewer (`log_date`)
//! - [`LogDate`] - Day selector, `MM/DD/YYYY`
//!
//! ### Events (`events`)
//! - [`PushEvent`] - `active` / `update` notifications from the backend
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use labtable_core::prelude::*;
//! ```

pub mod document;
pub mod error;
pub mod events;
pub mod log_date;
pub mod logging;
pub mod prelude;
pub mod row;
pub mod schema;
pub mod waveform;

// Re-export commonly used types at crate root for convenience
pub use document::{parse_counter, stringify, RowRecord, SaveStatus, SettingsDocument};
pub use error::{Error, Result, ResultExt};
pub use events::{parse_row_id, PushEvent};
pub use log_date::LogDate;
pub use row::{Row, RowId, RowTemplate, RunState, START_DATE_FORMAT};
pub use schema::{
    normalize_field, ColumnRole, FieldSchema, DEFAULT_EDITOR_FIELDS, DEFAULT_LOG_FIELDS,
    EDITOR_CONTROL_SLOTS, LOG_VIEWER_CONTROL_SLOTS, RUN_KEY, SINGLESHOT_KEY, TEST_ID_KEY,
};
pub use waveform::{sample_range, Waveform};
