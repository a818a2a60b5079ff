//! File-backed session store.
//!
//! The session lives in a small JSON object, e.g.
//! `{"token": "eyJ...", "roomId": "0b6c..."}`. Every read goes back to disk so
//! that a login performed by another process is picked up immediately.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::{ROOM_ID_KEY, SessionStore, TOKEN_KEY};
use crate::error::{Error, Result};

/// Session store persisted as a JSON file with owner-only permissions.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    /// Open (lazily) the store at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(Error::storage(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(Error::storage(format!(
                "failed to parse {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Replace the file atomically: readers see the old or the new session,
    /// never a truncated one.
    fn save(&self, map: &Map<String, Value>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let content = serde_json::to_string_pretty(map)
            .map_err(|e| Error::storage(format!("failed to serialize session: {}", e)))?;

        let mut temp = NamedTempFile::new_in(dir)?;

        #[cfg(unix)]
        {
            use std::fs::Permissions;
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = temp.as_file().set_permissions(Permissions::from_mode(0o600)) {
                warn!("Failed to restrict session file permissions: {}", e);
            }
        }

        temp.write_all(content.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| {
            Error::storage(format!("failed to replace {}: {}", self.path.display(), e.error))
        })?;

        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .load()?
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn put(&self, key: &str, value: Option<&str>) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| Error::storage("session lock poisoned"))?;

        let mut map = self.load()?;
        let changed = match value {
            Some(v) => map.insert(key.to_string(), Value::String(v.to_string()))
                != Some(Value::String(v.to_string())),
            None => map.remove(key).is_some(),
        };

        if changed {
            debug!(key, path = %self.path.display(), "Updating session store");
            self.save(&map)?;
        }
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
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
