//! Client-side persistence
//!
//! The browser original keeps two keys in localStorage (`auth-storage` and
//! `token`); here the same keys go through a [`SessionStore`] trait so any
//! host can supply persistence. Values are opaque JSON strings.

use crate::error::{Result, SdkError};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

/// Key under which the persisted auth subset is stored.
pub const AUTH_STORAGE_KEY: &str = "auth-storage";

/// Key under which journaled pending record calls are stored.
pub const PENDING_RECORDS_KEY: &str = "pending-records";

/// Key-value persistence surviving process restarts (or not, for the
/// in-memory variant).
pub trait SessionStore: Send + Sync {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str);
}

/// In-memory store; nothing survives the process.
#[derive(Default)]
pub struct MemorySessionStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .get(key)
            .cloned()
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.values
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .remove(key);
    }
}

/// File-backed store: one JSON file per key inside a directory.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Some(value),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::debug!("Failed to read {}: {}", key, err);
                None
            }
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| SdkError::Storage(e.to_string()))?;
        std::fs::write(self.path_for(key), value).map_err(|e| SdkError::Storage(e.to_string()))
    }

    fn remove(&self, key: &str) {
        if let Err(err) = std::fs::remove_file(self.path_for(key)) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!("Failed to remove {}: {}", key, err);
            }
        }
    }
}
