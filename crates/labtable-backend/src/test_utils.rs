//! Test utilities for settings stores
//!
//! [`MemoryBackend`] keeps the document in memory and records every call so
//! tests can assert on what the application sent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use labtable_core::prelude::*;
use labtable_core::{LogDate, RowId, SaveStatus, SettingsDocument};

use crate::store::TableBackend;

#[derive(Debug, Default)]
struct MemoryState {
    document: SettingsDocument,
    logs: HashMap<LogDate, SettingsDocument>,
    saves: Vec<SettingsDocument>,
    deleted: Vec<(LogDate, RowId)>,
    failing: bool,
}

/// In-memory settings store shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with `document`.
    pub fn with_document(document: SettingsDocument) -> Self {
        let backend = Self::new();
        backend.lock().document = document;
        backend
    }

    /// Add a day's log.
    pub fn with_log(self, date: LogDate, document: SettingsDocument) -> Self {
        self.lock().logs.insert(date, document);
        self
    }

    /// Make every following call fail with a backend error.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Every document saved so far, oldest first.
    pub fn saves(&self) -> Vec<SettingsDocument> {
        self.lock().saves.clone()
    }

    pub fn last_saved(&self) -> Option<SettingsDocument> {
        self.lock().saves.last().cloned()
    }

    /// Every `(date, rowid)` delete request so far.
    pub fn deleted(&self) -> Vec<(LogDate, RowId)> {
        self.lock().deleted.clone()
    }

    pub fn log(&self, date: LogDate) -> Option<SettingsDocument> {
        self.lock().logs.get(&date).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(&self) -> Result<()> {
        if self.lock().failing {
            Err(Error::backend("memory backend set to fail"))
        } else {
            Ok(())
        }
    }
}

impl TableBackend for MemoryBackend {
    async fn load(&self) -> Result<SettingsDocument> {
        self.check()?;
        Ok(self.lock().document.clone())
    }

    async fn save(&self, document: &SettingsDocument) -> Result<SaveStatus> {
        self.check()?;
        let mut state = self.lock();
        state.document = document.clone();
        state.saves.push(document.clone());
        Ok(SaveStatus::success())
    }

    async fn load_log(&self, date: LogDate) -> Result<SettingsDocument> {
        self.check()?;
        self.lock()
            .logs
            .get(&date)
            .cloned()
            .ok_or_else(|| Error::backend_status(format!("{}/table_load", date), 404))
    }

    async fn delete_test(&self, date: LogDate, rowid: RowId) -> Result<()> {
        self.check()?;
        let mut state = self.lock();
        state.deleted.push((date, rowid));
        if let Some(log) = state.logs.get_mut(&date) {
            log.data.retain(|record| {
                record.get(labtable_core::TEST_ID_KEY) != Some(rowid.to_string().as_str())
            });
        }
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labtable_core::RowRecord;

    #[tokio::test]
    async fn test_failing_backend() {
        let backend = MemoryBackend::new();
        backend.set_failing(true);

        assert!(backend.load().await.is_err());
        assert!(backend.save(&SettingsDocument::default()).await.is_err());
        assert!(backend.saves().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_from_log() {
        let date = LogDate::parse("10/19/2026").unwrap();
        let mut log = SettingsDocument::default();
        log.data
            .push([("testid", "1")].into_iter().collect::<RowRecord>());
        log.data
            .push([("testid", "2")].into_iter().collect::<RowRecord>());
        let backend = MemoryBackend::new().with_log(date, log);

        backend.delete_test(date, 1).await.unwrap();

        assert_eq!(backend.deleted(), vec![(date, 1)]);
        assert_eq!(backend.log(date).unwrap().data.len(), 1);
    }
}
