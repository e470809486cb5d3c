//! Shutdown signalling between the request handlers and the control loop.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Sending half of the shutdown channel, held by the router.
///
/// Cloned into every request task; any POST fires it.
#[derive(Debug, Clone)]
pub struct ShutdownTrigger {
    tx: mpsc::Sender<()>,
}

/// Receiving half of the shutdown channel, held by the server handle.
#[derive(Debug)]
pub struct ShutdownSignal {
    rx: mpsc::Receiver<()>,
}

/// Create a connected trigger/signal pair.
pub fn shutdown_channel() -> (ShutdownTrigger, ShutdownSignal) {
    let (tx, rx) = mpsc::channel(1);
    (ShutdownTrigger { tx }, ShutdownSignal { rx })
}

impl ShutdownTrigger {
    /// Fire the shutdown signal.
    ///
    /// A signal that is already pending, or a consumer that has gone away,
    /// makes this a no-op.
    pub fn trigger(&self) {
        match self.tx.try_send(()) {
            Ok(()) => tracing::debug!("Shutdown signal sent"),
            Err(TrySendError::Full(())) => tracing::debug!("Shutdown already pending"),
            Err(TrySendError::Closed(())) => tracing::debug!("Shutdown already consumed"),
        }
    }
}

impl ShutdownSignal {
    /// Wait for the signal. A closed channel counts as a signal.
    pub async fn recv(&mut self) {
        let _ = self.rx.recv().await;
    }
}
