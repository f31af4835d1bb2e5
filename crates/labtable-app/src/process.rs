//! Message processing through the TEA update loop

use tokio::sync::{mpsc, watch};

use labtable_backend::Backend;

use crate::actions::handle_action;
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function
///
/// Follow-up messages are processed in the same call; actions are handed to
/// [`handle_action`] as they are produced.
pub fn process_message(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    backend: &Backend,
    shutdown_rx: &watch::Receiver<bool>,
) {
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, msg_tx.clone(), backend, shutdown_rx.clone());
        }

        // Continue with follow-up message
        msg = result.message;
    }
}

/// Dispatch the startup actions (initial load, push subscription).
pub fn start(
    state: &mut AppState,
    msg_tx: &mpsc::Sender<Message>,
    backend: &Backend,
    shutdown_rx: &watch::Receiver<bool>,
) {
    for action in handler::startup_actions(state) {
        handle_action(action, msg_tx.clone(), backend, shutdown_rx.clone());
    }
}
