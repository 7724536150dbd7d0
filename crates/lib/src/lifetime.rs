//! Process-lifetime controller: handlers ask for a stop, the host waits on it.

use std::sync::Arc;
use tokio::sync::watch;

/// Capability to request orderly process termination.
pub trait LifetimeController: Send + Sync {
    /// Idempotent; safe to call from concurrent handler completions. Does not wait for exit.
    fn request_stop(&self);
}

impl<T: LifetimeController + ?Sized> LifetimeController for Arc<T> {
    fn request_stop(&self) {
        (**self).request_stop()
    }
}

/// Host-side lifetime: a one-way stop flag that the main task awaits.
#[derive(Clone)]
pub struct AppLifetime {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for AppLifetime {
    fn default() -> Self {
        Self::new()
    }
}

impl AppLifetime {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn is_stopping(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once a stop has been requested (immediately if it already was).
    pub async fn stopped(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in self, so the channel cannot close while we wait.
        let _ = rx.wait_for(|stopping| *stopping).await;
    }
}

impl LifetimeController for AppLifetime {
    fn request_stop(&self) {
        let already = self.tx.send_replace(true);
        if already {
            log::debug!("lifetime: stop already requested");
        } else {
            log::info!("lifetime: stop requested");
        }
    }
}
