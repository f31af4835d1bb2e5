//! Settings store operations
//!
//! This module provides the [`TableBackend`] trait for loading and persisting
//! the table, and the [`Backend`] handle the application dispatches through.

use labtable_core::prelude::*;
use labtable_core::{LogDate, RowId, SaveStatus, SettingsDocument};

use crate::file::FileBackend;
use crate::http::HttpBackend;
#[cfg(any(test, feature = "test-helpers"))]
use crate::test_utils::MemoryBackend;

/// Settings store operations.
///
/// Every save sends the whole document; the store keeps whichever save
/// completes last.
#[trait_variant::make(TableBackend: Send)]
pub trait LocalTableBackend {
    /// Fetch the persisted table (`GET /table_load`)
    async fn load(&self) -> Result<SettingsDocument>;

    /// Replace the persisted table (`POST /table_save`)
    async fn save(&self, document: &SettingsDocument) -> Result<SaveStatus>;

    /// Fetch the test log of one day (`GET /<MM>/<DD>/<YYYY>/table_load`)
    async fn load_log(&self, date: LogDate) -> Result<SettingsDocument>;

    /// Delete one test from a day's log (`POST /<MM>/<DD>/<YYYY>/del_test`)
    async fn delete_test(&self, date: LogDate, rowid: RowId) -> Result<()>;

    /// Where the table lives, for the header bar
    fn describe(&self) -> String;
}

/// The store selected at startup.
///
/// The traits are not object safe, so dispatch goes through this enum.
/// Calls are fully qualified: the blanket `LocalTableBackend` impl makes
/// method syntax ambiguous while both traits are in scope.
#[derive(Debug, Clone)]
pub enum Backend {
    Http(HttpBackend),
    File(FileBackend),
    #[cfg(any(test, feature = "test-helpers"))]
    Memory(MemoryBackend),
}

impl TableBackend for Backend {
    async fn load(&self) -> Result<SettingsDocument> {
        match self {
            Backend::Http(b) => TableBackend::load(b).await,
            Backend::File(b) => TableBackend::load(b).await,
            #[cfg(any(test, feature = "test-helpers"))]
            Backend::Memory(b) => TableBackend::load(b).await,
        }
    }

    async fn save(&self, document: &SettingsDocument) -> Result<SaveStatus> {
        match self {
            Backend::Http(b) => TableBackend::save(b, document).await,
            Backend::File(b) => TableBackend::save(b, document).await,
            #[cfg(any(test, feature = "test-helpers"))]
            Backend::Memory(b) => TableBackend::save(b, document).await,
        }
    }

    async fn load_log(&self, date: LogDate) -> Result<SettingsDocument> {
        match self {
            Backend::Http(b) => TableBackend::load_log(b, date).await,
            Backend::File(b) => TableBackend::load_log(b, date).await,
            #[cfg(any(test, feature = "test-helpers"))]
            Backend::Memory(b) => TableBackend::load_log(b, date).await,
        }
    }

    async fn delete_test(&self, date: LogDate, rowid: RowId) -> Result<()> {
        match self {
            Backend::Http(b) => TableBackend::delete_test(b, date, rowid).await,
            Backend::File(b) => TableBackend::delete_test(b, date, rowid).await,
            #[cfg(any(test, feature = "test-helpers"))]
            Backend::Memory(b) => TableBackend::delete_test(b, date, rowid).await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Backend::Http(b) => TableBackend::describe(b),
            Backend::File(b) => TableBackend::describe(b),
            #[cfg(any(test, feature = "test-helpers"))]
            Backend::Memory(b) => TableBackend::describe(b),
        }
    }
}

impl From<HttpBackend> for Backend {
    fn from(backend: HttpBackend) -> Self {
        Backend::Http(backend)
    }
}

impl From<FileBackend> for Backend {
    fn from(backend: FileBackend) -> Self {
        Backend::File(backend)
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl From<MemoryBackend> for Backend {
    fn from(backend: MemoryBackend) -> Self {
        Backend::Memory(backend)
    }
}
