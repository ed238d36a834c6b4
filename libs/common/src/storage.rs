//! Key-value client storage
//!
//! This module provides the persisted client state used by the session and
//! profile layers: an in-memory store for tests and short-lived processes,
//! and a JSON file store that survives restarts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::error::StorageResult;

/// Storage key names shared with the rest of the application
pub mod keys {
    /// Short-lived bearer credential
    pub const ACCESS_TOKEN: &str = "access_token";
    /// Long-lived credential used only to mint access tokens
    pub const REFRESH_TOKEN: &str = "refresh_token";
    /// Serialized session info of the logged-in user
    pub const USER: &str = "user";
    /// Path to return to once the user has logged in again
    pub const REDIRECT_AFTER_LOGIN: &str = "redirect_after_login";
    /// Unsaved profile edits
    pub const PROFILE_DRAFT: &str = "profile_draft";
}

/// Key-value storage backend
pub trait Storage: Send + Sync {
    /// Get a value by key
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Set a key-value pair, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete a key; deleting a missing key is not an error
    fn remove(&self, key: &str) -> StorageResult<()>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Process-local storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory storage
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// Storage persisted as a single JSON object on disk
///
/// The whole file is rewritten on every mutation, which is fine for the
/// handful of keys a client keeps.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Open the storage file, creating an empty one if it does not exist
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();

        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            HashMap::new()
        };

        info!(
            "File storage opened at {} with {} entries",
            path.display(),
            entries.len()
        );

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, raw)?;
        debug!("Persisted {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = lock(&self.entries);
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value.to_string());

        // Memory only follows once the file holds the new contents
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = lock(&self.entries);
        if !entries.contains_key(key) {
            return Ok(());
        }

        let mut updated = entries.clone();
        updated.remove(key);
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "common-storage-{}-{}.json",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_memory_set_get_remove() -> StorageResult<()> {
        let storage = MemoryStorage::new();

        storage.set(keys::ACCESS_TOKEN, "token-a")?;
        assert_eq!(storage.get(keys::ACCESS_TOKEN)?, Some("token-a".to_string()));

        storage.set(keys::ACCESS_TOKEN, "token-b")?;
        assert_eq!(storage.get(keys::ACCESS_TOKEN)?, Some("token-b".to_string()));

        storage.remove(keys::ACCESS_TOKEN)?;
        assert_eq!(storage.get(keys::ACCESS_TOKEN)?, None);

        // Removing twice is fine
        storage.remove(keys::ACCESS_TOKEN)?;
        Ok(())
    }

    #[test]
    fn test_file_storage_survives_reopen() -> StorageResult<()> {
        let path = scratch_path("reopen");
        let _ = std::fs::remove_file(&path);

        {
            let storage = FileStorage::open(&path)?;
            storage.set(keys::REFRESH_TOKEN, "refresh-1")?;
            storage.set(keys::REDIRECT_AFTER_LOGIN, "/courses/1")?;
            storage.remove(keys::REDIRECT_AFTER_LOGIN)?;
        }

        let reopened = FileStorage::open(&path)?;
        assert_eq!(
            reopened.get(keys::REFRESH_TOKEN)?,
            Some("refresh-1".to_string())
        );
        assert_eq!(reopened.get(keys::REDIRECT_AFTER_LOGIN)?, None);

        std::fs::remove_file(&path)?;
        Ok(())
    }

    #[test]
    fn test_failed_write_leaves_entries_untouched() -> StorageResult<()> {
        let path = scratch_path("failed-write");
        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_dir(&path);

        let storage = FileStorage::open(&path)?;
        storage.set(keys::ACCESS_TOKEN, "token-a")?;

        // A directory in place of the file makes every write fail
        std::fs::remove_file(&path)?;
        std::fs::create_dir(&path)?;

        assert!(storage.set(keys::ACCESS_TOKEN, "token-b").is_err());
        assert!(storage.remove(keys::ACCESS_TOKEN).is_err());
        assert_eq!(storage.get(keys::ACCESS_TOKEN)?, Some("token-a".to_string()));

        std::fs::remove_dir(&path)?;
        Ok(())
    }

    #[test]
    fn test_file_storage_rejects_garbage() {
        let path = scratch_path("garbage");
        std::fs::write(&path, "not json").expect("write scratch file");

        let result = FileStorage::open(&path);
        assert!(matches!(
            result,
            Err(crate::error::StorageError::Serialization(_))
        ));

        let _ = std::fs::remove_file(&path);
    }
}
