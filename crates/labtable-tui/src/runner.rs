//! Main TUI runner - entry point and event loop
//!
//! Contains the application lifecycle:
//! - `run`: Sets up the terminal, dispatches startup actions, runs the loop
//! - `run_loop`: Processes background messages, draws, and polls input

use tokio::sync::{mpsc, watch};

use labtable_app::message::Message;
use labtable_app::state::AppState;
use labtable_app::{process, signals};
use labtable_backend::Backend;
use labtable_core::prelude::*;

use super::{event, render, terminal};

/// Capacity of the channel background tasks report on
const MESSAGE_CHANNEL_CAPACITY: usize = 256;

/// Run the TUI until the operator quits
pub async fn run(mut state: AppState, backend: Backend) -> Result<()> {
    // Install panic hook for terminal restoration
    terminal::install_panic_hook();

    let mut term = ratatui::init();

    // Unified message channel for background tasks and the signal handler
    let (msg_tx, msg_rx) = mpsc::channel::<Message>(MESSAGE_CHANNEL_CAPACITY);

    // Shutdown signal for background tasks
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Sends Message::Quit on SIGINT/SIGTERM
    signals::spawn_signal_handler(msg_tx.clone(), shutdown_rx.clone());

    info!(
        "Starting {} session against {}",
        if state.is_read_only() {
            "log viewer"
        } else {
            "editor"
        },
        state.backend_label
    );
    process::start(&mut state, &msg_tx, &backend, &shutdown_rx);

    let result = run_loop(&mut term, &mut state, msg_rx, msg_tx, &backend, &shutdown_rx);

    // Stop the push subscription
    let _ = shutdown_tx.send(true);

    ratatui::restore();
    result
}

/// Main event loop
fn run_loop(
    terminal: &mut ratatui::DefaultTerminal,
    state: &mut AppState,
    mut msg_rx: mpsc::Receiver<Message>,
    msg_tx: mpsc::Sender<Message>,
    backend: &Backend,
    shutdown_rx: &watch::Receiver<bool>,
) -> Result<()> {
    while !state.should_quit() {
        // Process background results (loads, saves, push events, signals)
        while let Ok(msg) = msg_rx.try_recv() {
            process::process_message(state, msg, &msg_tx, backend, shutdown_rx);
        }

        terminal.draw(|frame| render::view(frame, state))?;

        // Handle terminal events
        if let Some(message) = event::poll()? {
            process::process_message(state, message, &msg_tx, backend, shutdown_rx);
        }
    }

    debug!("Event loop finished");
    Ok(())
}
