//! CLI argument definitions using clap derive macros.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand};
use prioritask_core::{HistoryPeriod, TaskCategory, TaskStatus};
use uuid::Uuid;

/// Prioritask command-line client
///
/// Household task management: tasks, tags, rooms, history and AI suggestions.
#[derive(Parser, Debug)]
#[command(name = "ptk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Login, registration and session status
    Auth(AuthCommand),

    /// Create, edit and complete tasks
    Task(TaskCommand),

    /// Manage tags and tag tasks
    Tag(TagCommand),

    /// Shared rooms (households) and the selected room
    Room(RoomCommand),

    /// Assign tasks to other users
    Assign(AssignCommand),

    /// AI suggestions: prioritize, group, rewrite titles
    Ai(AiCommand),

    /// Activity history across rooms and users
    History {
        /// Look-back window in days (7, 14, 30, 180, 360)
        #[arg(short, long)]
        period: Option<HistoryPeriod>,

        /// Only entries for this room
        #[arg(short, long)]
        room: Option<String>,

        /// Only entries by this user
        #[arg(short, long)]
        user: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List registered users
    Users {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Check configuration, session and API connectivity
    Doctor,

    /// Show version
    Version,
}

// ─────────────────────────────────────────────────────────────────────────────
// Authentication Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub action: AuthAction,
}

#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Log in with email and password
    Login {
        /// Account email (prompted if omitted)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Create an account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email
        #[arg(short, long)]
        email: String,
    },

    /// Forget the stored token (the selected room is kept)
    Logout,

    /// Show who is logged in
    Status,

    /// Renew the access token now
    Refresh,
}

// ─────────────────────────────────────────────────────────────────────────────
// Task Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand, Debug)]
pub enum TaskAction {
    /// List your tasks
    List {
        /// Filter by status (todo, in-progress, done)
        #[arg(short, long)]
        status: Option<TaskStatus>,

        /// Filter by category
        #[arg(short, long)]
        category: Option<TaskCategory>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Create a task
    Add {
        /// Task title
        title: String,

        /// Category (limpieza, compra, mantenimiento, otro)
        #[arg(short, long, default_value = "otro")]
        category: TaskCategory,

        /// Longer description
        #[arg(short, long)]
        description: Option<String>,

        /// Relative weight (effort)
        #[arg(short, long, default_value_t = 1.0)]
        weight: f64,

        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(long, value_parser = parse_due_date)]
        due: Option<DateTime<Utc>>,
    },

    /// Change fields of a task
    Edit {
        /// Task ID
        task_id: Uuid,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        category: Option<TaskCategory>,

        #[arg(short, long)]
        weight: Option<f64>,

        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(long, value_parser = parse_due_date)]
        due: Option<DateTime<Utc>>,

        /// Send a full update (PUT) instead of a partial one (PATCH)
        #[arg(long)]
        replace: bool,
    },

    /// Set the status of a task
    Status {
        /// Task ID
        task_id: Uuid,

        /// New status (todo, in-progress, done)
        status: TaskStatus,
    },

    /// Mark a task done, or reopen it if it already is
    Toggle {
        /// Task ID
        task_id: Uuid,
    },

    /// Delete a task
    Delete {
        /// Task ID
        task_id: Uuid,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the change log of a task
    History {
        /// Task ID
        task_id: Uuid,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Tag Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct TagCommand {
    #[command(subcommand)]
    pub action: TagAction,
}

#[derive(Subcommand, Debug)]
pub enum TagAction {
    /// List tags
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Create a tag (2-50 characters)
    Add { name: String },

    /// Rename a tag
    Rename { tag_id: Uuid, name: String },

    /// Delete a tag
    Delete { tag_id: Uuid },

    /// Set the tags of a task
    Apply {
        /// Task ID
        task_id: Uuid,

        /// Tag IDs (none clears the task's tags)
        tag_ids: Vec<Uuid>,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Room Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct RoomCommand {
    #[command(subcommand)]
    pub action: RoomAction,
}

#[derive(Subcommand, Debug)]
pub enum RoomAction {
    /// List rooms
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Create a room and select it
    Create { name: String },

    /// List the tasks of a room and select it
    Tasks {
        /// Room ID (defaults to the selected room)
        room_id: Option<String>,

        /// Maximum number of tasks
        #[arg(short, long, default_value_t = 100)]
        limit: u32,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Select a room
    Select { room_id: String },

    /// Show the selected room
    Current,

    /// Forget the selected room
    Clear,
}

// ─────────────────────────────────────────────────────────────────────────────
// Assignment Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct AssignCommand {
    #[command(subcommand)]
    pub action: AssignAction,
}

#[derive(Subcommand, Debug)]
pub enum AssignAction {
    /// Assign a task to a user
    Add { task_id: Uuid, user_id: String },

    /// List the tasks assigned to a user
    List {
        user_id: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Remove a user from a task
    Remove { task_id: Uuid, user_id: String },
}

// ─────────────────────────────────────────────────────────────────────────────
// AI Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct AiCommand {
    #[command(subcommand)]
    pub action: AiAction,
}

#[derive(Subcommand, Debug)]
pub enum AiAction {
    /// Rank tasks by priority
    Prioritize {
        /// Task IDs (all tasks if omitted)
        task_ids: Vec<Uuid>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Group related tasks
    Group {
        /// Task IDs (all tasks if omitted)
        task_ids: Vec<Uuid>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Suggest clearer task titles
    Rewrite {
        /// Task IDs (all tasks if omitted)
        task_ids: Vec<Uuid>,

        /// Apply suggestions (asks for each one unless --yes)
        #[arg(short, long)]
        apply: bool,

        /// Apply without asking
        #[arg(short, long, requires = "apply")]
        yes: bool,
    },
}

/// Parse `YYYY-MM-DD` (noon UTC) or a full RFC 3339 timestamp.
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc() + chrono::Duration::hours(12));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| format!("invalid date '{}' (expected YYYY-MM-DD)", raw))
}
