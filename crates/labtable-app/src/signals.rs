//! Terminal signals end the session: SIGINT or SIGTERM on unix, Ctrl+C
//! elsewhere. Each becomes a [`Message::Quit`] for the update loop.

use tokio::sync::{mpsc, watch};

use labtable_core::prelude::*;

use crate::message::Message;

/// Signal that ended the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(unix), allow(dead_code))]
enum ShutdownSignal {
    Interrupt,
    Terminate,
}

impl ShutdownSignal {
    fn name(self) -> &'static str {
        match self {
            ShutdownSignal::Interrupt => "SIGINT",
            ShutdownSignal::Terminate => "SIGTERM",
        }
    }
}

/// Spawn the signal listener.
///
/// The task ends after forwarding one quit, or as soon as `shutdown_rx`
/// turns `true`.
pub fn spawn_signal_handler(tx: mpsc::Sender<Message>, mut shutdown_rx: watch::Receiver<bool>) {
    tokio::spawn(async move {
        tokio::select! {
            received = next_signal() => match received {
                Ok(signal) => {
                    info!("{} received, quitting", signal.name());
                    let _ = tx.send(Message::Quit).await;
                }
                Err(e) => error!("Signal handler error: {}", e),
            },
            _ = async { let _ = shutdown_rx.wait_for(|quit| *quit).await; } => {
                debug!("Signal handler stopped");
            }
        }
    });
}

#[cfg(unix)]
async fn next_signal() -> Result<ShutdownSignal> {
    use tokio::signal::unix::{signal, SignalKind};

    let listen = |kind: SignalKind, name: &str| {
        signal(kind).map_err(|e| Error::terminal(format!("Failed to install {name} handler: {e}")))
    };
    let mut interrupt = listen(SignalKind::interrupt(), "SIGINT")?;
    let mut terminate = listen(SignalKind::terminate(), "SIGTERM")?;

    Ok(tokio::select! {
        _ = interrupt.recv() => ShutdownSignal::Interrupt,
        _ = terminate.recv() => ShutdownSignal::Terminate,
    })
}

#[cfg(not(unix))]
async fn next_signal() -> Result<ShutdownSignal> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| Error::terminal(format!("Failed to listen for Ctrl+C: {e}")))?;
    Ok(ShutdownSignal::Interrupt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_no_quit_without_a_signal() {
        let (tx, mut rx) = mpsc::channel::<Message>(1);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        spawn_signal_handler(tx, shutdown_rx);
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_listener_exits_on_shutdown() {
        let (tx, mut rx) = mpsc::channel::<Message>(1);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        spawn_signal_handler(tx, shutdown_rx);
        shutdown_tx.send(true).unwrap();

        // Sender dropped with the task, without a quit
        let closed = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert!(closed.is_none());
    }

    #[test]
    fn test_signal_names() {
        assert_eq!(ShutdownSignal::Interrupt.name(), "SIGINT");
        assert_eq!(ShutdownSignal::Terminate.name(), "SIGTERM");
    }
}
