//! File-backed key-value storage.
//!
//! The whole map is kept in memory and rewritten as one JSON object on every
//! change. Writes go to a sibling temporary file that is then renamed over the
//! target, so a crash mid-write leaves the previous contents intact.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use ticketdesk_core::environment::{KeyValueStorage, StorageError};

/// [`KeyValueStorage`] persisted to a JSON file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open the storage at `path`, creating nothing until the first write.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if an existing file cannot be read and
    /// [`StorageError::Corrupt`] if it is not a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| StorageError::Corrupt(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StorageError::Io(format!("{}: {e}", path.display()))),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened storage");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// File backing this storage.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update(&self, change: impl FnOnce(&mut BTreeMap<String, String>) -> bool) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        let mut next = entries.clone();
        if !change(&mut next) {
            return Ok(());
        }
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io = |e: std::io::Error| StorageError::Io(format!("{}: {e}", self.path.display()));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io)?;
        }
        let raw = serde_json::to_vec_pretty(entries).map_err(|e| StorageError::Corrupt(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, raw).map_err(io)?;
        fs::rename(&tmp, &self.path).map_err(io)
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string()).as_deref() != Some(value)
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| entries.remove(key).is_some())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ticketdesk-storage-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir.join("storage.json")
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = scratch("reopen");
        let storage = FileStorage::open(&path).unwrap();
        storage.set("auth_token", "jwt").unwrap();
        storage.set("user_role", "admin").unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("auth_token").unwrap().as_deref(), Some("jwt"));
        assert_eq!(reopened.get("user_role").unwrap().as_deref(), Some("admin"));
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let path = scratch("remove");
        let storage = FileStorage::open(&path).unwrap();
        storage.remove("nothing").unwrap();
        assert!(!path.exists());

        storage.set("k", "v").unwrap();
        storage.remove("k").unwrap();
        assert_eq!(FileStorage::open(&path).unwrap().get("k").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let path = scratch("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(FileStorage::open(&path), Err(StorageError::Corrupt(_))));
    }
}
