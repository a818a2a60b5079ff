//! Command implementations for the ptk CLI.
//!
//! Each submodule implements the logic for a command group.

pub mod ai;
pub mod assign;
pub mod auth;
pub mod doctor;
pub mod history;
pub mod room;
pub mod tag;
pub mod task;
pub mod user;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use prioritask_core::{ApiClient, TaskStatus};
use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;

/// Build an API client backed by the configured session file.
pub fn connect(config: &Config) -> Result<ApiClient> {
    let store = Arc::new(config.session_store());
    ApiClient::new(config.client_config()?, store).context("Failed to create API client")
}

/// Pretty-print `value` as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Spinner on stderr for slow (AI) calls.
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// First block of a UUID, enough to recognize a task in a list.
pub fn short_id(id: &Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

pub fn status_label(status: TaskStatus) -> ColoredString {
    match status {
        TaskStatus::Todo => "TODO".yellow(),
        TaskStatus::InProgress => "IN PROGRESS".cyan(),
        TaskStatus::Done => "DONE".green(),
    }
}

pub fn header(title: &str) {
    println!("{}", title.cyan().bold());
    println!("{}", "─".repeat(50));
}
