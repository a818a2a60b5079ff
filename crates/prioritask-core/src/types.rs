//! Shared types for prioritask-core.
//!
//! Field names follow the backend's JSON (`titulo`, `estado`, `nombre`, ...)
//! so that records round-trip without renaming.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─────────────────────────────────────────────────────────────────────────────
// Auth
// ─────────────────────────────────────────────────────────────────────────────

/// Body returned by login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub nombre: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl User {
    /// Name to show in lists: email, or the user's name if there is no email.
    pub fn label(&self) -> &str {
        if self.email.is_empty() {
            self.nombre.as_deref().unwrap_or(&self.id)
        } else {
            &self.email
        }
    }
}

fn default_true() -> bool {
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// Tasks
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskCategory {
    Limpieza,
    Compra,
    Mantenimiento,
    Otro,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 4] = [
        TaskCategory::Limpieza,
        TaskCategory::Compra,
        TaskCategory::Mantenimiento,
        TaskCategory::Otro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Limpieza => "LIMPIEZA",
            TaskCategory::Compra => "COMPRA",
            TaskCategory::Mantenimiento => "MANTENIMIENTO",
            TaskCategory::Otro => "OTRO",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown category '{}' (expected one of: limpieza, compra, mantenimiento, otro)",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }

    /// Status after the "mark done / undo" toggle.
    pub fn toggled(&self) -> TaskStatus {
        match self {
            TaskStatus::Done => TaskStatus::Todo,
            _ => TaskStatus::Done,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace(['-', ' '], "_").as_str() {
            "TODO" => Ok(TaskStatus::Todo),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "DONE" => Ok(TaskStatus::Done),
            _ => Err(format!(
                "unknown status '{}' (expected one of: todo, in-progress, done)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub titulo: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    pub categoria: TaskCategory,
    pub estado: TaskStatus,
    pub peso: f64,
    #[serde(default, with = "flexible_datetime::option")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(with = "flexible_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
}

/// Payload for creating a task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    pub titulo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    pub categoria: TaskCategory,
    pub estado: TaskStatus,
    pub peso: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    /// A `TODO` task of weight 1.0.
    pub fn new(titulo: impl Into<String>, categoria: TaskCategory) -> Self {
        Self {
            titulo: titulo.into(),
            descripcion: None,
            categoria,
            estado: TaskStatus::Todo,
            peso: 1.0,
            due_date: None,
        }
    }

    pub fn with_description(mut self, descripcion: impl Into<String>) -> Self {
        self.descripcion = Some(descripcion.into());
        self
    }

    pub fn with_weight(mut self, peso: f64) -> Self {
        self.peso = peso;
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Partial task update. Unset fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub titulo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria: Option<TaskCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peso: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskUpdate {
    pub fn title(titulo: impl Into<String>) -> Self {
        Self {
            titulo: Some(titulo.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct StatusUpdate {
    pub estado: TaskStatus,
}

/// One entry of a task's own audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskHistoryRecord {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: String,
    pub action: String,
    #[serde(with = "flexible_datetime")]
    pub timestamp: DateTime<Utc>,
    /// JSON-encoded `{ field: { old, new } }` map for updates.
    #[serde(default)]
    pub changes: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// History feed
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryTask {
    pub id: Uuid,
    pub titulo: String,
    pub estado: TaskStatus,
    #[serde(default)]
    pub room_id: Option<String>,
}

/// One entry of the household-wide history feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub action: String,
    #[serde(with = "flexible_datetime")]
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub task: HistoryTask,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tags
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub nombre: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct TagName<'a> {
    pub nombre: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct TagAssignRequest<'a> {
    pub tag_ids: &'a [Uuid],
}

/// Plain `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Rooms
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub nombre: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
}

/// Response to room creation. Older backends call the id `room_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRoom {
    #[serde(alias = "room_id")]
    pub id: String,
    pub nombre: String,
    #[serde(default)]
    pub owner: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RoomName<'a> {
    pub nombre: &'a str,
}

// ─────────────────────────────────────────────────────────────────────────────
// Assignments
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub task_id: Uuid,
    pub user_id: String,
    pub asignado_por: String,
    #[serde(with = "flexible_datetime")]
    pub fecha: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AssignRequest<'a> {
    pub task_id: Uuid,
    pub user_id: &'a str,
}

// ─────────────────────────────────────────────────────────────────────────────
// AI suggestions
// ─────────────────────────────────────────────────────────────────────────────

/// Selects which tasks an AI endpoint works on. An empty selection means
/// "all of my tasks".
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskSelection {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub task_ids: Vec<Uuid>,
}

impl TaskSelection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only(task_ids: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            task_ids: task_ids.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrioritizedTask {
    pub id: Uuid,
    pub titulo: String,
    pub prioridad: String,
    pub motivo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRef {
    pub id: Uuid,
    pub titulo: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedTasks {
    #[serde(default)]
    pub grupos: BTreeMap<String, Vec<TaskRef>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewrittenTask {
    pub id: Uuid,
    pub original: String,
    pub reformulada: String,
    #[serde(default)]
    pub motivo: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Datetime handling
// ─────────────────────────────────────────────────────────────────────────────

/// Accepts RFC 3339 timestamps as well as the naive `2025-06-01T12:00:00`
/// form the backend emits for UTC columns.
pub(crate) mod flexible_datetime {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid datetime '{}'", raw)))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid datetime '{}'", raw))),
                None => Ok(None),
            }
        }
    }
}
