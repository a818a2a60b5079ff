//! In-memory session store.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{ROOM_ID_KEY, SessionStore, TOKEN_KEY};
use crate::error::{Error, Result};

/// Session store that lives only as long as the process.
///
/// Useful for tests and for embedding the client where persistence is
/// handled elsewhere.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<&'static str, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds an access token.
    pub fn with_token(token: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(TOKEN_KEY, token.into());
        Self {
            entries: RwLock::new(entries),
        }
    }

    fn get(&self, key: &'static str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| Error::storage("session lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &'static str, value: Option<&str>) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| Error::storage("session lock poisoned"))?;
        match value {
            Some(v) => entries.insert(key, v.to_string()),
            None => entries.remove(key),
        };
        Ok(())
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Result<Option<String>> {
        self.get(TOKEN_KEY)
    }

    fn set_token(&self, token: &str) -> Result<()> {
        self.put(TOKEN_KEY, Some(token))
    }

    fn clear_token(&self) -> Result<()> {
        self.put(TOKEN_KEY, None)
    }

    fn room_id(&self) -> Result<Option<String>> {
        self.get(ROOM_ID_KEY)
    }

    fn set_room_id(&self, room_id: &str) -> Result<()> {
        self.put(ROOM_ID_KEY, Some(room_id))
    }

    fn clear_room_id(&self) -> Result<()> {
        self.put(ROOM_ID_KEY, None)
    }
}
