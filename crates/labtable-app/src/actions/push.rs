//! Push channel connection and event forwarding.
//!
//! [`spawn_push_connection`] connects to the Socket.IO endpoint and then
//! translates [`PushClientEvent`]s into TEA [`Message`]s until the client
//! gives up or the application shuts down.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use labtable_backend::{socket_io_url, PushClient, PushClientEvent};

use crate::message::Message;

/// Maximum time to wait for the initial websocket connection.
const PUSH_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Spawn a task that connects to the push channel and forwards events.
pub(super) fn spawn_push_connection(
    server: String,
    msg_tx: mpsc::Sender<Message>,
    shutdown_rx: watch::Receiver<bool>,
) {
    tokio::spawn(async move {
        let ws_url = match socket_io_url(&server) {
            Ok(url) => url,
            Err(e) => {
                let _ = msg_tx
                    .send(Message::PushConnectionFailed {
                        error: e.to_string(),
                    })
                    .await;
                return;
            }
        };

        let connect_result =
            tokio::time::timeout(PUSH_CONNECT_TIMEOUT, PushClient::connect(&ws_url)).await;

        let client = match connect_result {
            Ok(Ok(client)) => client,
            Ok(Err(e)) => {
                warn!("Push channel: connection to {} failed: {}", ws_url, e);
                let _ = msg_tx
                    .send(Message::PushConnectionFailed {
                        error: e.to_string(),
                    })
                    .await;
                return;
            }
            Err(_) => {
                warn!("Push channel: connection to {} timed out", ws_url);
                let _ = msg_tx
                    .send(Message::PushConnectionFailed {
                        error: "Connection timed out".to_string(),
                    })
                    .await;
                return;
            }
        };

        let _ = msg_tx.send(Message::PushConnected).await;
        forward_push_events(client, msg_tx, shutdown_rx).await;
    });
}

/// Receive push client events and translate them into TEA Messages.
///
/// Runs until the client reports it has stopped, its event channel closes,
/// or the shutdown watch channel turns `true`.
async fn forward_push_events(
    mut client: PushClient,
    msg_tx: mpsc::Sender<Message>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            event = client.event_receiver().recv() => {
                let msg = match event {
                    Some(PushClientEvent::Event(event)) => Message::Push(event),
                    Some(PushClientEvent::Reconnecting { attempt, max_attempts }) => {
                        Message::PushReconnecting { attempt, max_attempts }
                    }
                    Some(PushClientEvent::Reconnected) => Message::PushReconnected,
                    Some(PushClientEvent::Disconnected) | None => {
                        info!("Push event stream ended");
                        let _ = msg_tx.send(Message::PushDisconnected).await;
                        return;
                    }
                };
                if msg_tx.send(msg).await.is_err() {
                    // TEA loop is gone
                    client.disconnect().await;
                    return;
                }
            }
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    info!("Push channel shutdown");
                    client.disconnect().await;
                    return;
                }
            }
        }
    }
}
