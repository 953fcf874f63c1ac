//! File-backed credential store.
//!
//! Persists the four credential entries as a flat JSON object in a single
//! file under the config directory. Every operation is best-effort: I/O and
//! serialization failures are logged at `warn` and degrade to defaults, the
//! caller never sees an error. A corrupt file reads as empty.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::warn;

use ifarm_core::auth::UserInfo;
use ifarm_core::credential::{
    CredentialStore, KEY_ACCESS_TOKEN, KEY_REFRESH_TOKEN, KEY_REMEMBER_LOGIN, KEY_USER_INFO,
};

use crate::paths;

/// Credential store backed by a single JSON file.
///
/// The file is read and rewritten whole on each access; entries are plain
/// JSON values keyed by the fixed storage keys.
pub struct JsonFileCredentialStore {
    path: PathBuf,
    // Serializes read-modify-write cycles against the file.
    lock: Mutex<()>,
}

impl JsonFileCredentialStore {
    /// Creates a store at the default path (`<config>/ifarm-admin/credentials.json`).
    ///
    /// Returns `None` when the platform config directory cannot be determined.
    pub fn new() -> Option<Self> {
        paths::credentials_file().map(Self::with_path)
    }

    /// Creates a store at a custom path (for tests).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    fn read_map(&self) -> Map<String, Value> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str::<Map<String, Value>>(&raw) {
                Ok(map) => map,
                Err(err) => {
                    warn!(path = %self.path.display(), %err, "credential file is corrupt, treating as empty");
                    Map::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "failed to read credential file");
                Map::new()
            }
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, raw).with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }

    fn set(&self, key: &str, value: Value) {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut map = self.read_map();
        map.insert(key.to_string(), value);
        if let Err(err) = self.write_map(&map) {
            warn!(key, %err, "failed to persist credential entry");
        }
    }

    fn get(&self, key: &str) -> Option<Value> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.read_map().get(key).cloned()
    }

    fn remove(&self, key: &str) {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut map = self.read_map();
        if map.remove(key).is_some() {
            if let Err(err) = self.write_map(&map) {
                warn!(key, %err, "failed to remove credential entry");
            }
        }
    }
}

impl CredentialStore for JsonFileCredentialStore {
    fn set_access_token(&self, token: &str) {
        self.set(KEY_ACCESS_TOKEN, Value::String(token.to_string()));
    }

    fn access_token(&self) -> Option<String> {
        self.get(KEY_ACCESS_TOKEN)
            .and_then(|v| v.as_str().map(str::to_string))
    }

    fn remove_access_token(&self) {
        self.remove(KEY_ACCESS_TOKEN);
    }

    fn set_refresh_token(&self, token: &str) {
        self.set(KEY_REFRESH_TOKEN, Value::String(token.to_string()));
    }

    fn refresh_token(&self) -> Option<String> {
        self.get(KEY_REFRESH_TOKEN)
            .and_then(|v| v.as_str().map(str::to_string))
    }

    fn remove_refresh_token(&self) {
        self.remove(KEY_REFRESH_TOKEN);
    }

    fn set_user_info(&self, user: &UserInfo) {
        match serde_json::to_value(user) {
            Ok(value) => self.set(KEY_USER_INFO, value),
            Err(err) => warn!(%err, "failed to serialize user info"),
        }
    }

    fn user_info(&self) -> Option<UserInfo> {
        let value = self.get(KEY_USER_INFO)?;
        match serde_json::from_value(value) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(%err, "stored user info is unreadable");
                None
            }
        }
    }

    fn remove_user_info(&self) {
        self.remove(KEY_USER_INFO);
    }

    fn set_remember_login(&self, remember: bool) {
        self.set(KEY_REMEMBER_LOGIN, Value::Bool(remember));
    }

    fn remember_login(&self) -> bool {
        self.get(KEY_REMEMBER_LOGIN)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}
