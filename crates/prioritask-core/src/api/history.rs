//! The household-wide history feed.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, SecondsFormat, Utc};
use uuid::Uuid;

use crate::client::{ApiClient, ApiRequest};
use crate::error::Result;
use crate::types::{HistoryEntry, Task, TaskStatus};

/// Look-back windows offered by the history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryPeriod {
    #[default]
    Week,
    TwoWeeks,
    Month,
    SixMonths,
    Year,
}

impl HistoryPeriod {
    pub const ALL: [HistoryPeriod; 5] = [
        HistoryPeriod::Week,
        HistoryPeriod::TwoWeeks,
        HistoryPeriod::Month,
        HistoryPeriod::SixMonths,
        HistoryPeriod::Year,
    ];

    pub fn days(&self) -> u32 {
        match self {
            HistoryPeriod::Week => 7,
            HistoryPeriod::TwoWeeks => 14,
            HistoryPeriod::Month => 30,
            HistoryPeriod::SixMonths => 180,
            HistoryPeriod::Year => 360,
        }
    }

    pub fn from_days(days: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.days() == days)
    }

    /// Start of the window ending at `now`. Windows of up to 30 days go back
    /// in days; longer ones go back `days / 30` calendar months.
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let days = self.days();
        if days <= 30 {
            return now - Duration::days(i64::from(days));
        }
        now.checked_sub_months(Months::new(days / 30))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryPeriod::Week => f.write_str("last 7 days"),
            HistoryPeriod::TwoWeeks => f.write_str("last 14 days"),
            HistoryPeriod::Month => f.write_str("last 30 days"),
            HistoryPeriod::SixMonths => f.write_str("last 6 months"),
            HistoryPeriod::Year => f.write_str("last year"),
        }
    }
}

impl FromStr for HistoryPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let days = s.trim().trim_end_matches('d');
        days.parse::<u32>()
            .ok()
            .and_then(Self::from_days)
            .ok_or_else(|| format!("unknown period '{}' (expected one of: 7, 14, 30, 180, 360)", s))
    }
}

/// Query for [`ApiClient::list_history`]. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryFilter {
    pub since: Option<DateTime<Utc>>,
    pub room_id: Option<String>,
    pub user_id: Option<String>,
}

impl HistoryFilter {
    /// Filter for `period` ending now.
    pub fn for_period(period: HistoryPeriod) -> Self {
        Self::for_period_at(period, Utc::now())
    }

    pub fn for_period_at(period: HistoryPeriod, now: DateTime<Utc>) -> Self {
        Self {
            since: Some(period.since(now)),
            ..Self::default()
        }
    }

    pub fn in_room(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = Some(room_id.into());
        self
    }

    pub fn by_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    fn to_request(&self) -> ApiRequest {
        ApiRequest::get("/history")
            .query_opt(
                "since",
                self.since
                    .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true)),
            )
            .query_opt("room_id", self.room_id.as_deref().filter(|s| !s.is_empty()))
            .query_opt("user_id", self.user_id.as_deref().filter(|s| !s.is_empty()))
    }
}

impl ApiClient {
    pub async fn list_history(&self, filter: &HistoryFilter) -> Result<Vec<HistoryEntry>> {
        self.execute(filter.to_request()).await
    }

    /// Flip a task between done and not done, given the status it is shown
    /// with.
    pub async fn toggle_task_status(&self, task_id: Uuid, shown: TaskStatus) -> Result<Task> {
        self.set_task_status(task_id, shown.toggled()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;
    use chrono::TimeZone;
    use serde_json::json;

    use crate::test_support::MockBackend;

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_short_periods_count_days() {
        let now = noon(2025, 3, 15);
        assert_eq!(HistoryPeriod::Week.since(now), noon(2025, 3, 8));
        assert_eq!(HistoryPeriod::Month.since(now), noon(2025, 2, 13));
    }

    #[test]
    fn test_long_periods_count_months() {
        let now = noon(2025, 8, 31);
        assert_eq!(HistoryPeriod::SixMonths.since(now), noon(2025, 2, 28));
        assert_eq!(HistoryPeriod::Year.since(now), noon(2024, 8, 31));
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("14".parse::<HistoryPeriod>(), Ok(HistoryPeriod::TwoWeeks));
        assert_eq!("180d".parse::<HistoryPeriod>(), Ok(HistoryPeriod::SixMonths));
        assert!("15".parse::<HistoryPeriod>().is_err());
        assert_eq!(HistoryPeriod::from_days(360), Some(HistoryPeriod::Year));
    }

    #[test]
    fn test_filter_query() {
        let filter = HistoryFilter::for_period_at(HistoryPeriod::Week, noon(2025, 3, 15))
            .in_room("r-1")
            .by_user("");
        let request = filter.to_request();

        assert_eq!(
            request.query_pairs(),
            &[
                ("since".to_string(), "2025-03-08T12:00:00.000Z".to_string()),
                ("room_id".to_string(), "r-1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_history() {
        let backend = MockBackend::start().await;
        backend.accept_token("tok");
        backend.on(
            Method::GET,
            "/history",
            200,
            json!([{
                "id": "h-1",
                "action": "CREATED",
                "timestamp": "2025-03-10T08:00:00",
                "user_id": "u-1",
                "task": {
                    "id": "123e4567-e89b-12d3-a456-426614174000",
                    "titulo": "Barrer",
                    "estado": "DONE",
                    "room_id": "r-1"
                }
            }]),
        );
        let (client, _) = backend.client(Some("tok"));

        let filter = HistoryFilter::default().by_user("u-1");
        let entries = client.list_history(&filter).await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].task.estado, TaskStatus::Done);
        assert_eq!(
            backend.requests_to("/history")[0].query.as_deref(),
            Some("user_id=u-1")
        );
    }

    #[tokio::test]
    async fn test_toggle_done_task_reopens_it() {
        let backend = MockBackend::start().await;
        backend.accept_token("tok");
        let id = Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap();
        let path = format!("/tasks/{}/status", id);
        backend.on(
            Method::PATCH,
            &path,
            200,
            json!({
                "id": id,
                "titulo": "Barrer",
                "categoria": "LIMPIEZA",
                "estado": "TODO",
                "peso": 1.0,
                "created_at": "2025-03-10T08:00:00"
            }),
        );
        let (client, _) = backend.client(Some("tok"));

        let task = client.toggle_task_status(id, TaskStatus::Done).await.unwrap();

        assert_eq!(task.estado, TaskStatus::Todo);
        assert_eq!(backend.requests_to(&path)[0].body, Some(json!({ "estado": "TODO" })));
    }
}
