//! Configuration types for labtable
//!
//! Defines `Settings` (`.labtable/config.toml`) and its sections.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use labtable_core::{DEFAULT_EDITOR_FIELDS, DEFAULT_LOG_FIELDS};

/// Application settings (.labtable/config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub push: PushSettings,

    #[serde(default)]
    pub table: TableSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

/// Where the acquisition daemon listens
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BackendSettings {
    /// Base URL of the daemon's HTTP API
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

/// Live update channel
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PushSettings {
    /// Subscribe to `active` / `update` events
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Socket.IO server; defaults to the backend URL
    #[serde(default)]
    pub url: Option<String>,
}

impl Default for PushSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            url: None,
        }
    }
}

/// Table layout
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TableSettings {
    /// Comma-separated column list of the test editor
    #[serde(default = "default_fields")]
    pub fields: String,

    /// Comma-separated column list of the log viewer
    #[serde(default = "default_log_fields")]
    pub log_fields: String,

    /// Top-level document keys with this suffix are port fields
    #[serde(default = "default_port_suffix")]
    pub port_suffix: String,

    /// Port fields shown even before the backend reports them
    #[serde(default)]
    pub ports: Vec<String>,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            fields: default_fields(),
            log_fields: default_log_fields(),
            port_suffix: default_port_suffix(),
            ports: Vec::new(),
        }
    }
}

fn default_fields() -> String {
    DEFAULT_EDITOR_FIELDS.to_string()
}

fn default_log_fields() -> String {
    DEFAULT_LOG_FIELDS.to_string()
}

fn default_port_suffix() -> String {
    "_port".to_string()
}

/// Display settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UiSettings {
    /// How long a status flash stays visible
    #[serde(default = "default_flash_ms")]
    pub flash_ms: u64,

    /// Glyph count of the inline waveform sparkline
    #[serde(default = "default_sparkline_width")]
    pub sparkline_width: u16,
}

impl UiSettings {
    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.flash_ms)
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            flash_ms: default_flash_ms(),
            sparkline_width: default_sparkline_width(),
        }
    }
}

fn default_flash_ms() -> u64 {
    1000
}

fn default_sparkline_width() -> u16 {
    20
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.backend.url, "http://localhost:5000");
        assert_eq!(settings.backend.timeout(), Duration::from_secs(5));
        assert!(settings.push.enabled);
        assert_eq!(settings.push.url, None);
        assert_eq!(settings.table.port_suffix, "_port");
        assert_eq!(settings.ui.flash_duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let settings: Settings = toml::from_str(
            r#"
[backend]
url = "http://lab:8080"

[ui]
sparkline_width = 32
"#,
        )
        .unwrap();

        assert_eq!(settings.backend.url, "http://lab:8080");
        assert_eq!(settings.backend.timeout_ms, 5000);
        assert_eq!(settings.ui.sparkline_width, 32);
        assert_eq!(settings.ui.flash_ms, 1000);
        assert_eq!(settings.table, TableSettings::default());
    }
}
