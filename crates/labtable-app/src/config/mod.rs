//! Configuration file parsing for labtable
//!
//! Supports `.labtable/config.toml` in the working directory.

pub mod settings;
pub mod types;

pub use settings::{init_config_dir, load_settings, CONFIG_FILENAME, LABTABLE_DIR};
pub use types::*;
