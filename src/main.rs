//! labtable - Terminal front end for a laboratory test-control backend
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use std::path::PathBuf;

use clap::Parser;

use labtable_app::config::{self, Settings};
use labtable_app::state::AppState;
use labtable_backend::{Backend, FileBackend, HttpBackend, TableBackend};
use labtable_core::prelude::*;
use labtable_core::LogDate;

/// labtable - edit, run and review instrument test configurations
#[derive(Parser, Debug)]
#[command(name = "labtable")]
#[command(about = "Terminal test table for a laboratory acquisition daemon", long_about = None)]
struct Args {
    /// Directory holding `.labtable/config.toml` (defaults to the current directory)
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Base URL of the acquisition daemon, overriding `backend.url`
    #[arg(long, value_name = "URL", conflicts_with = "file")]
    backend: Option<String>,

    /// Keep the table in a local JSON file instead of the daemon
    #[arg(long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Open the read-only test log of a past day
    #[arg(long, value_name = "MM/DD/YYYY")]
    log: Option<LogDate>,

    /// Do not subscribe to live active/update events
    #[arg(long)]
    no_push: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    // Logging goes to a file; the TUI owns stdout
    labtable_core::logging::init()?;

    let base_path = args
        .path
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    if let Err(e) = config::init_config_dir(&base_path) {
        warn!("Could not create default config: {}", e);
    }
    let settings = apply_overrides(config::load_settings(&base_path), &args);

    let backend = select_backend(&args, &settings)?;
    let label = backend.describe();
    info!("Table store: {}", label);

    let state = match args.log {
        Some(date) => AppState::log_viewer(settings, date, label),
        None => AppState::editor(settings, label),
    };

    let result = labtable_tui::run(state, backend).await;
    if let Err(ref e) = result {
        if e.is_fatal() {
            error!("Application error: {:?}", e);
        } else {
            warn!("Exited with error: {:?}", e);
        }
        if let Ok(log_file) = labtable_core::logging::get_current_log_file() {
            eprintln!("See {} for details", log_file.display());
        }
    }
    info!("labtable exiting");
    result?;
    Ok(())
}

/// Fold command-line flags into the loaded settings
fn apply_overrides(mut settings: Settings, args: &Args) -> Settings {
    if let Some(url) = &args.backend {
        settings.backend.url = url.clone();
    }
    if args.no_push || args.file.is_some() {
        // A local file has no daemon to push events
        settings.push.enabled = false;
    }
    settings
}

fn select_backend(args: &Args, settings: &Settings) -> Result<Backend> {
    match &args.file {
        Some(path) => Ok(FileBackend::new(path).into()),
        None => {
            let http = HttpBackend::new(&settings.backend.url, settings.backend.timeout())?;
            Ok(http.into())
        }
    }
}
