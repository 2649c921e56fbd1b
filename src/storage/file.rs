use crate::core::error::StorageError;
use crate::storage::KeyValueStore;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// File-backed key-value store
///
/// The whole key space lives in one JSON object. Every `set` and `remove`
/// rewrites the file through a temp file and rename, so a crash leaves
/// either the old or the new contents on disk. A change only becomes
/// visible to `get` once it has been written.
pub struct FileStore {
    entries: Mutex<BTreeMap<String, String>>,
    path: PathBuf,
}

impl FileStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)
                .context(format!("Failed to read storage file: {}", path.display()))?;

            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                    Ok(entries) => entries,
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Storage file is not a JSON string map, starting empty"
                        );
                        BTreeMap::new()
                    }
                }
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Storage file opened");

        Ok(FileStore {
            entries: Mutex::new(entries),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("storage lock poisoned".to_string()))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn update<F>(&self, apply: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut entries = self.lock()?;
        let mut next = entries.clone();
        apply(&mut next);
        self.write_entries(&next)?;
        *entries = next;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if !self.lock()?.contains_key(key) {
            return Ok(());
        }
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path().join("store.json")).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let store = FileStore::open(path.clone()).unwrap();
        store.set("ugai_loggedIn", "001").unwrap();
        store.set("ugai_notifs_001", "[]").unwrap();
        drop(store);

        let reopened = FileStore::open(path).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.get("ugai_loggedIn").unwrap(), Some("001".to_string()));
        assert_eq!(reopened.get("ugai_notifs_001").unwrap(), Some("[]".to_string()));
    }

    #[test]
    fn test_remove_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let store = FileStore::open(path.clone()).unwrap();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();

        let reopened = FileStore::open(path).unwrap();
        assert_eq!(reopened.get("k").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_opens_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        fs::write(&path, "not json at all").unwrap();

        let store = FileStore::open(path).unwrap();
        assert!(store.is_empty());

        // Still writable afterwards
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn test_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("store.json");

        let store = FileStore::open(path.clone()).unwrap();
        store.set("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_failed_write_leaves_value_unset() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the file should be makes the rename fail
        let path = temp_dir.path().join("store.json");
        fs::create_dir(&path).unwrap();

        let blocked = FileStore {
            entries: Mutex::new(BTreeMap::new()),
            path: path.clone(),
        };
        assert!(blocked.set("k", "v").is_err());
        assert_eq!(blocked.get("k").unwrap(), None);
    }
}
