//! Action handlers: UpdateAction dispatch and background task spawning
//!
//! Every action runs as a detached tokio task that reports back to the TEA
//! loop with a [`Message`]. Saves are fire-and-forget: overlapping saves run
//! concurrently and the store keeps whichever completes last.

mod push;

use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use labtable_backend::{Backend, TableBackend};

use crate::handler::UpdateAction;
use crate::message::Message;

/// Execute an action by spawning a background task
pub fn handle_action(
    action: UpdateAction,
    msg_tx: mpsc::Sender<Message>,
    backend: &Backend,
    shutdown_rx: watch::Receiver<bool>,
) {
    match action {
        UpdateAction::LoadSettings => {
            let backend = backend.clone();
            tokio::spawn(async move {
                let msg = match backend.load().await {
                    Ok(document) => Message::SettingsLoaded { document },
                    Err(e) => Message::SettingsLoadFailed {
                        error: e.to_string(),
                    },
                };
                let _ = msg_tx.send(msg).await;
            });
        }

        UpdateAction::LoadLog { date } => {
            let backend = backend.clone();
            tokio::spawn(async move {
                let msg = match backend.load_log(date).await {
                    Ok(document) => Message::SettingsLoaded { document },
                    Err(e) => Message::SettingsLoadFailed {
                        error: e.to_string(),
                    },
                };
                let _ = msg_tx.send(msg).await;
            });
        }

        UpdateAction::SaveSettings { seq, document } => {
            let backend = backend.clone();
            tokio::spawn(async move {
                debug!("Save #{}: sending {} rows", seq, document.data.len());
                let msg = match backend.save(&document).await {
                    Ok(status) => Message::SaveCompleted { seq, status },
                    Err(e) => {
                        warn!("Save #{} failed: {}", seq, e);
                        Message::SaveFailed {
                            seq,
                            error: e.to_string(),
                        }
                    }
                };
                let _ = msg_tx.send(msg).await;
            });
        }

        UpdateAction::DeleteTest { date, rowid } => {
            let backend = backend.clone();
            tokio::spawn(async move {
                let msg = match backend.delete_test(date, rowid).await {
                    Ok(()) => Message::TestDeleted { rowid },
                    Err(e) => Message::DeleteFailed {
                        rowid,
                        error: e.to_string(),
                    },
                };
                let _ = msg_tx.send(msg).await;
            });
        }

        UpdateAction::ConnectPush { server } => {
            push::spawn_push_connection(server, msg_tx, shutdown_rx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labtable_backend::test_utils::MemoryBackend;
    use labtable_core::{LogDate, RowRecord, SettingsDocument};
    use std::time::Duration;

    async fn recv(rx: &mut mpsc::Receiver<Message>) -> Message {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_load_reports_document() {
        let document = SettingsDocument {
            last_tid: 5,
            ..Default::default()
        };
        let backend = Backend::from(MemoryBackend::with_document(document));
        let (tx, mut rx) = mpsc::channel(4);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        handle_action(UpdateAction::LoadSettings, tx, &backend, shutdown_rx);

        match recv(&mut rx).await {
            Message::SettingsLoaded { document } => assert_eq!(document.last_tid, 5),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_save_reports_error() {
        let memory = MemoryBackend::new();
        memory.set_failing(true);
        let backend = Backend::from(memory);
        let (tx, mut rx) = mpsc::channel(4);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        handle_action(
            UpdateAction::SaveSettings {
                seq: 3,
                document: SettingsDocument::default(),
            },
            tx,
            &backend,
            shutdown_rx,
        );

        assert!(matches!(
            recv(&mut rx).await,
            Message::SaveFailed { seq: 3, .. }
        ));
    }

    #[tokio::test]
    async fn test_delete_reports_acknowledged_rowid() {
        let date = LogDate::parse("10/19/2026").unwrap();
        let log = SettingsDocument {
            data: vec![[("testid", "8")].into_iter().collect::<RowRecord>()],
            ..Default::default()
        };
        let memory = MemoryBackend::new().with_log(date, log);
        let backend = Backend::from(memory.clone());
        let (tx, mut rx) = mpsc::channel(4);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        handle_action(
            UpdateAction::DeleteTest { date, rowid: 8 },
            tx,
            &backend,
            shutdown_rx,
        );

        assert!(matches!(recv(&mut rx).await, Message::TestDeleted { rowid: 8 }));
        assert_eq!(memory.deleted(), vec![(date, 8)]);
        assert!(memory.log(date).unwrap().data.is_empty());
    }
}
