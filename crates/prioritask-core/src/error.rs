//! Error types for prioritask-core.

use thiserror::Error;

/// Result type alias using prioritask-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Prioritask operations
#[derive(Error, Debug)]
pub enum Error {
    // Transport errors
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request cancelled")]
    Cancelled,

    // Application errors (a response was received)
    #[error("Unauthorized{}", detail_suffix(.detail))]
    Unauthorized { detail: Option<String> },

    #[error("Not found: {path}{}", detail_suffix(.detail))]
    NotFound { path: String, detail: Option<String> },

    #[error("API error {status}{}", detail_suffix(.detail))]
    Api { status: u16, detail: Option<String> },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    // Client-side input checks
    #[error("Invalid input: {0}")]
    Validation(String),

    // Session store errors
    #[error("Session store error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(": {}", d),
        None => String::new(),
    }
}

impl Error {
    /// Build the error for a non-success HTTP status.
    pub fn from_status(status: u16, path: &str, detail: Option<String>) -> Self {
        match status {
            401 => Self::Unauthorized { detail },
            404 => Self::NotFound {
                path: path.to_string(),
                detail,
            },
            _ => Self::Api { status, detail },
        }
    }

    /// HTTP status carried by this error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-provided `detail` message, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { detail }
            | Self::NotFound { detail, .. }
            | Self::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Message suitable for showing next to a form: the server's `detail`
    /// when present, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            _ => self
                .detail()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }

    /// True when the session is no longer usable and the user must log in.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e.to_string())
    }
}
