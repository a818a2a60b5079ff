//! Single-flight token refresh.
//!
//! When several requests hit a 401 at the same time, only the first one
//! calls the refresh endpoint. The others join the same in-flight future and
//! receive its outcome.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::debug;

/// Why a refresh did not produce a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RefreshFailure {
    /// No session to renew.
    NoSession,
    /// The refresh endpoint answered with a non-success status.
    Rejected(u16),
    /// The refresh endpoint could not be reached.
    Transport(String),
    /// The refresh endpoint answered without a usable token.
    Malformed(String),
    /// The new token could not be persisted.
    Storage(String),
}

impl std::fmt::Display for RefreshFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSession => write!(f, "no session to refresh"),
            Self::Rejected(status) => write!(f, "refresh rejected with status {}", status),
            Self::Transport(e) => write!(f, "refresh request failed: {}", e),
            Self::Malformed(e) => write!(f, "refresh response unusable: {}", e),
            Self::Storage(e) => write!(f, "could not store refreshed token: {}", e),
        }
    }
}

pub(crate) type RefreshOutcome = std::result::Result<String, RefreshFailure>;

type InFlight = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Coalesces concurrent refresh attempts into one.
#[derive(Default)]
pub(crate) struct RefreshGate {
    in_flight: Mutex<Option<(u64, InFlight)>>,
    next_id: AtomicU64,
}

impl RefreshGate {
    /// Join the in-flight refresh, or start one with `start` if none is
    /// running.
    pub(crate) async fn run<F>(&self, start: F) -> RefreshOutcome
    where
        F: FnOnce() -> BoxFuture<'static, RefreshOutcome>,
    {
        let (id, flight) = {
            let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some((id, flight)) => {
                    debug!(flight = id, "Joining in-flight token refresh");
                    (*id, flight.clone())
                }
                None => {
                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    let flight = start().shared();
                    *slot = Some((id, flight.clone()));
                    debug!(flight = id, "Starting token refresh");
                    (id, flight)
                }
            }
        };

        let outcome = flight.await;

        let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(slot.as_ref(), Some((current, _)) if *current == id) {
            *slot = None;
        }

        outcome
    }

    #[cfg(test)]
    fn is_idle(&self) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}
