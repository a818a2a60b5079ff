//! Session store: persisted access token and selected room.
//!
//! The API client never touches persistent storage directly. It receives a
//! [`SessionStore`] at construction time and reads the token from it on every
//! request.
//!
//! ```text
//! login ──► set_token ──► (every request) token ──► refresh ──► set_token
//!                                                      │
//!                                                      └─ failure ─► clear_token
//! ```
//!
//! The selected room has its own lifecycle: logout and refresh failure leave
//! it untouched.

mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

use crate::error::Result;

/// Persisted key for the access token.
pub const TOKEN_KEY: &str = "token";

/// Persisted key for the selected room id.
pub const ROOM_ID_KEY: &str = "roomId";

/// Key-value persistence for the session token and selected room id.
///
/// All operations are synchronous and idempotent. Reads have no side effects.
pub trait SessionStore: Send + Sync {
    /// Current access token, if logged in.
    fn token(&self) -> Result<Option<String>>;

    /// Store a new access token, replacing any previous one.
    fn set_token(&self, token: &str) -> Result<()>;

    /// Forget the access token.
    fn clear_token(&self) -> Result<()>;

    /// Currently selected room id.
    fn room_id(&self) -> Result<Option<String>>;

    /// Select a room.
    fn set_room_id(&self, room_id: &str) -> Result<()>;

    /// Forget the selected room.
    fn clear_room_id(&self) -> Result<()>;
}
