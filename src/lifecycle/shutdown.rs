//! Shutdown coordination.

use tokio::sync::broadcast;

/// Broadcasts a single stop signal to the server and its background tasks.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe before triggering; late subscribers miss the signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Stop everything subscribed so far.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once `rx` sees the signal or its sender is gone.
pub async fn wait_for(mut rx: broadcast::Receiver<()>) {
    let _ = rx.recv().await;
}
