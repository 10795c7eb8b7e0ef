//! Defines an abstraction over the completion hand-off to the foreground loop.

use super::events::AppEvent;
use tokio::sync::mpsc::UnboundedSender;

/// A trait that abstracts the sending of app events.
/// This is "fire-and-forget" and doesn't return a result, simplifying its use.
pub trait EventProxy: Send + Sync + Clone + 'static {
    fn send_event(&self, event: AppEvent);
}

/// The production hand-off: an unbounded channel drained by the shell loop.
impl EventProxy for UnboundedSender<AppEvent> {
    fn send_event(&self, event: AppEvent) {
        // A closed receiver means the shell is shutting down.
        if let Err(e) = self.send(event) {
            tracing::warn!("Failed to deliver event to the foreground loop: {}", e);
        }
    }
}
