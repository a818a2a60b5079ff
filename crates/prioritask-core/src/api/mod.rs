//! Typed gateways over the Prioritask REST API.
//!
//! Each submodule adds a group of methods to [`ApiClient`](crate::ApiClient).
//! They are thin: build the path and payload, validate obvious input errors,
//! and let the client core handle authentication.

mod ai;
mod assignments;
mod auth;
mod history;
mod rooms;
mod tags;
mod tasks;
mod users;

pub use history::{HistoryFilter, HistoryPeriod};

/// Percent-encode a value for use as a single path segment.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
