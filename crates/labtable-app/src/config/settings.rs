//! Settings loading and the default config file

use std::path::Path;

use labtable_core::prelude::*;

use super::types::Settings;

/// Directory holding labtable's configuration, relative to the working directory
pub const LABTABLE_DIR: &str = ".labtable";

/// Settings file name inside [`LABTABLE_DIR`]
pub const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_CONFIG: &str = r#"# labtable configuration

[backend]
url = "http://localhost:5000"   # acquisition daemon HTTP API
timeout_ms = 5000

[push]
enabled = true                  # live active/update events over Socket.IO
# url = "http://localhost:5000" # defaults to backend.url

[table]
fields = "Start Date, Test ID, LastWaveform, Serial Number, Mode (tr/pe), Channel, Channel 2, Gain (dB), Delay (us), Time (us), Freq (MHz), Notes, Filter Mode, Run (y/n)"
log_fields = "Start Date, Test ID, Serial Number, Mode (tr/pe), Channel, Channel 2, Gain (dB), Delay (us), Time (us), Freq (MHz), Notes"
port_suffix = "_port"
ports = []                      # e.g. ["pulser_port", "scope_port"]

[ui]
flash_ms = 1000                 # how long save status stays visible
sparkline_width = 20
"#;

/// Load settings from `.labtable/config.toml`
///
/// A missing or unparsable file yields the defaults.
pub fn load_settings(base_path: &Path) -> Settings {
    let config_path = base_path.join(LABTABLE_DIR).join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Create `.labtable/config.toml` with commented defaults if it is missing
pub fn init_config_dir(base_path: &Path) -> Result<()> {
    let labtable_dir = base_path.join(LABTABLE_DIR);

    if !labtable_dir.exists() {
        std::fs::create_dir_all(&labtable_dir)
            .map_err(|e| Error::config(format!("Failed to create .labtable dir: {}", e)))?;
    }

    let config_path = labtable_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        std::fs::write(&config_path, DEFAULT_CONFIG)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config at {:?}", config_path);
    }

    Ok(())
}
