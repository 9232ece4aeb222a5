//! Cooperative cancellation.

use std::sync::Arc;

use tokio::sync::watch;

/// Stop flag shared between the session and whoever may want to halt it.
///
/// Cloning gives another handle to the same flag. It stays stopped until
/// [`reset`](StopSignal::reset) re-arms it.
#[derive(Debug, Clone)]
pub struct StopSignal {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl StopSignal {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    /// Request a stop.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    /// Clear a consumed stop so the next run can proceed.
    pub fn reset(&self) {
        self.tx.send_replace(false);
    }

    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once [`stop`](Self::stop) has been called.
    pub async fn stopped(&self) {
        let mut rx = self.rx.clone();
        // The sender lives in `self`, so the channel cannot close here
        let _ = rx.wait_for(|stopped| *stopped).await;
    }
}
