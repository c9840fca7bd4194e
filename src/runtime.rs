//! Runtime - cancellation tokens for poll tasks and in-flight queries

use std::sync::Arc;
use tokio::sync::watch;

/// Cancellation signal shared between a controller and the tasks it spawns.
#[derive(Clone, Debug)]
pub struct CancelToken {
    sender: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self { Self::new() }
}

impl CancelToken {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender: Arc::new(sender) }
    }

    /// Trigger cancellation. Returns true only for the call that flipped the token.
    pub fn cancel(&self) -> bool {
        !self.sender.send_replace(true)
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolves once the token is cancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.sender.subscribe();
        // The sender lives as long as `self`, so wait_for cannot observe a closed channel.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}
