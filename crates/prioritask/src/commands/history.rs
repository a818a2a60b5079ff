use anyhow::Result;
use colored::Colorize;
use prioritask_core::{ApiClient, HistoryFilter, HistoryPeriod};

use super::{header, print_json, short_id, status_label};
use crate::config::Config;

pub async fn execute(
    period: Option<HistoryPeriod>,
    room: Option<String>,
    user: Option<String>,
    json: bool,
    client: &ApiClient,
    config: &Config,
) -> Result<()> {
    let period = period.unwrap_or_else(|| config.history_period());
    let mut filter = HistoryFilter::for_period(period);
    if let Some(room) = room {
        filter = filter.in_room(room);
    }
    if let Some(user) = user {
        filter = filter.by_user(user);
    }

    let entries = client.list_history(&filter).await?;
    if json {
        return print_json(&entries);
    }

    header(&format!("History ({})", period));
    if entries.is_empty() {
        println!("  {}", "Nothing happened in this period.".dimmed());
    }
    for entry in &entries {
        println!(
            "  {}  {:<8} {:<12} {}  {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.action.bold(),
            status_label(entry.task.estado),
            short_id(&entry.task.id).dimmed(),
            entry.task.titulo
        );
    }
    Ok(())
}
