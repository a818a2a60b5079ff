//! prioritask-core - Client library for the Prioritask API
//!
//! This crate provides everything the `ptk` CLI needs to talk to a
//! Prioritask backend:
//!
//! - **client**: Authenticated HTTP client with transparent token refresh
//! - **session**: Persisted access token and selected room
//! - **api**: Typed gateways for tasks, tags, rooms, users, history,
//!   assignments and AI suggestions
//! - **validation**: Client-side form checks

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use api::{HistoryFilter, HistoryPeriod};
pub use client::{ApiClient, ApiRequest, ApiResponse, SessionEvent};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
pub use tokio_util::sync::CancellationToken;
pub use types::*;
