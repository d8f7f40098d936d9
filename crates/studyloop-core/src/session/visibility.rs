//! Tab/window visibility as an external signal channel.
//!
//! Visibility changes are environment-sourced, not user commands; they
//! feed the same pause/resume paths as the explicit operations. The
//! channel here is the cancellable subscription the host environment
//! publishes into.

use tokio::sync::mpsc;

/// Host visibility state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Sending half, held by the host environment's visibility hook.
#[derive(Debug, Clone)]
pub struct VisibilityPublisher {
    tx: mpsc::UnboundedSender<Visibility>,
}

impl VisibilityPublisher {
    /// Publish a visibility change. Returns false once the subscription
    /// has been closed.
    pub fn publish(&self, visibility: Visibility) -> bool {
        self.tx.send(visibility).is_ok()
    }
}

/// Receiving half, drained by the session driver.
#[derive(Debug)]
pub struct VisibilitySubscription {
    rx: mpsc::UnboundedReceiver<Visibility>,
}

impl VisibilitySubscription {
    /// Next visibility change, or `None` when all publishers are gone.
    pub async fn next(&mut self) -> Option<Visibility> {
        self.rx.recv().await
    }

    /// Try to take a pending change without waiting.
    pub fn try_next(&mut self) -> Option<Visibility> {
        self.rx.try_recv().ok()
    }

    /// Cancel the subscription; subsequent publishes are dropped.
    pub fn close(&mut self) {
        self.rx.close();
    }
}

/// Create a visibility channel pair.
pub fn visibility_channel() -> (VisibilityPublisher, VisibilitySubscription) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        VisibilityPublisher { tx },
        VisibilitySubscription { rx },
    )
}
