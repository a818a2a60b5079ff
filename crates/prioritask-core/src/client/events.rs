//! Session lifecycle events.
//!
//! The client never navigates or prompts on its own. When the session ends
//! it publishes [`SessionEvent::SessionInvalidated`] and the host decides
//! what to do (typically: send the user back to login).

use tokio::sync::broadcast;
use tracing::debug;

/// Buffered events per subscriber before the oldest are dropped.
const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A login stored a new access token.
    LoggedIn,
    /// A refresh replaced the access token.
    TokenRefreshed,
    /// Refresh failed; the token was discarded and the user must log in again.
    SessionInvalidated,
    /// The user logged out explicitly.
    LoggedOut,
}

#[derive(Debug)]
pub(crate) struct EventBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    pub(crate) fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        if self.tx.send(event).is_err() {
            debug!(?event, "Session event had no subscribers");
        }
    }
}
