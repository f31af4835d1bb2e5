//! Settings store backed by a local JSON file
//!
//! Answers saves with the same `{"status": "success!"}` body the acquisition
//! daemon returns, so the UI cannot tell the two apart.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use labtable_core::prelude::*;
use labtable_core::{LogDate, RowId, SaveStatus, SettingsDocument};

use crate::store::TableBackend;

/// Settings store reading and writing one JSON file.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TableBackend for FileBackend {
    async fn load(&self) -> Result<SettingsDocument> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => {
                let document = SettingsDocument::from_json(&text)
                    .with_context(|| format!("Parsing {}", self.path.display()))?;
                debug!(
                    "Loaded {} rows from {}",
                    document.data.len(),
                    self.path.display()
                );
                Ok(document)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(
                    "No settings file at {}, starting empty",
                    self.path.display()
                );
                Ok(SettingsDocument::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, document: &SettingsDocument) -> Result<SaveStatus> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Atomic replace
        let temp = self.temp_path();
        tokio::fs::write(&temp, document.to_json_pretty()?).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        debug!(
            "Saved {} rows to {}",
            document.data.len(),
            self.path.display()
        );
        Ok(SaveStatus::success())
    }

    async fn load_log(&self, date: LogDate) -> Result<SettingsDocument> {
        Err(Error::backend(format!(
            "test log for {date} is only available from an HTTP backend"
        )))
    }

    async fn delete_test(&self, date: LogDate, _rowid: RowId) -> Result<()> {
        Err(Error::backend(format!(
            "test log for {date} is only available from an HTTP backend"
        )))
    }

    fn describe(&self) -> String {
        format!("file: {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labtable_core::RowRecord;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_loads_empty_document() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("table_state.json"));

        let doc = backend.load().await.unwrap();

        assert_eq!(doc, SettingsDocument::default());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("nested").join("table_state.json"));

        let mut doc = SettingsDocument {
            last_tid: 2,
            ..Default::default()
        };
        doc.set_port("scope_port", "COM3");
        doc.data.push(
            [("testid", "2"), ("channel", "A")]
                .into_iter()
                .collect::<RowRecord>(),
        );

        let status = backend.save(&doc).await.unwrap();
        assert_eq!(status.status, "success!");

        let loaded = backend.load().await.unwrap();
        assert_eq!(loaded, doc);
        assert!(!backend.temp_path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table_state.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileBackend::new(path).load().await.unwrap_err();

        assert!(matches!(err, Error::Json(_)));
    }

    #[tokio::test]
    async fn test_log_viewer_unsupported() {
        let backend = FileBackend::new("table_state.json");
        let date = LogDate::parse("10/19/2026").unwrap();

        assert!(backend.load_log(date).await.is_err());
        assert!(backend.delete_test(date, 1).await.is_err());
    }
}
