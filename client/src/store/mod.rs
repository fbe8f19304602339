//! Durable key-value store
//!
//! The persistence substrate is a collaborator, not part of the core: a
//! process-wide key -> JSON-string map with get/set and no transactions.
//! Aggregates are always written whole under their own key; last write
//! wins. A single process is assumed to be the only writer.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StoreError;

/// Key for the serialized [`aurafit_shared::UserProfile`]
pub const PROFILE_KEY: &str = "profile";

/// Key for the serialized workout log
pub const WORKOUT_LOG_KEY: &str = "workout_log";

/// Key for the serialized [`aurafit_shared::HabitCounters`]
pub const HABIT_COUNTERS_KEY: &str = "habit_counters";

/// Key for the daily-reset marker (ISO date, JSON-encoded)
pub const HABIT_LAST_UPDATE_KEY: &str = "habit_last_update_day";

/// Durable key -> JSON-string store
pub trait KeyValueStore {
    /// Read the raw JSON stored under `key`, `None` when absent
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write the raw JSON under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// File-backed store: one JSON file per key under a data directory
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating it if needed
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = dir.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "Opened file store");
        Ok(Self { root })
    }

    /// Open a store under the platform data directory (`<data>/aurafit`)
    pub fn open_default() -> Result<Self, StoreError> {
        let base = dirs::data_dir().ok_or(StoreError::NoDataDir)?;
        Self::open(base.join("aurafit"))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // Write-then-rename so a crash mid-write never leaves a truncated
        // aggregate behind.
        let path = self.path_for(key);
        let tmp = self.root.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory store for tests
#[derive(Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing the trait, for test setup
    pub fn insert_raw(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_set() {
        let mut store = MemoryStore::new();
        assert!(store.get("profile").unwrap().is_none());
        store.set("profile", "{\"a\":1}").unwrap();
        assert_eq!(store.get("profile").unwrap().unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();

        assert!(store.get(PROFILE_KEY).unwrap().is_none());
        store.set(PROFILE_KEY, "{\"name\":\"Alex\"}").unwrap();
        assert_eq!(
            store.get(PROFILE_KEY).unwrap().unwrap(),
            "{\"name\":\"Alex\"}"
        );
    }

    #[test]
    fn test_file_store_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.set(HABIT_COUNTERS_KEY, "1").unwrap();
        store.set(HABIT_COUNTERS_KEY, "2").unwrap();
        assert_eq!(store.get(HABIT_COUNTERS_KEY).unwrap().unwrap(), "2");
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = FileStore::open(dir.path()).unwrap();
            store.set(WORKOUT_LOG_KEY, "[]").unwrap();
        }
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get(WORKOUT_LOG_KEY).unwrap().unwrap(), "[]");
    }
}
