// Key-value storage backends.
// The cache and session layers persist through the KeyValueStore trait.
// Quota failures are an explicit error variant so the cache layer can react
// instead of silently losing writes.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage capacity exceeded")]
    CapacityExceeded,

    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Synchronous key-value store with prefix enumeration.
///
/// `set` must fail with [`StorageError::CapacityExceeded`] when a write
/// would push the store past its quota.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}

fn entry_bytes(key: &str, value: &str) -> usize {
    key.len() + value.len()
}

fn quota_allows(
    entries: &BTreeMap<String, String>,
    max_bytes: Option<usize>,
    key: &str,
    value: &str,
) -> bool {
    let Some(max) = max_bytes else {
        return true;
    };
    let used: usize = entries.iter().map(|(k, v)| entry_bytes(k, v)).sum();
    let replaced = entries.get(key).map(|v| entry_bytes(key, v)).unwrap_or(0);
    used - replaced + entry_bytes(key, value) <= max
}

/// In-memory store with an optional byte quota.
/// Used by tests and as a fallback when no cache directory resolves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    max_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(max_bytes: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            max_bytes: Some(max_bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if !quota_allows(&self.entries, self.max_bytes, key, value) {
            return Err(StorageError::CapacityExceeded);
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

/// Store persisted as a single JSON map, rewritten atomically via a temp
/// file on every mutation. Fine for the small record counts this
/// application keeps.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    max_bytes: Option<usize>,
}

impl FileStore {
    /// Open a store file. A missing file yields an empty store; a file
    /// that no longer parses as JSON is treated as lost and replaced.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            entries,
            max_bytes: None,
        })
    }

    pub fn with_quota(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(&self.entries)?;

        // Write atomically via temp file
        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if !quota_allows(&self.entries, self.max_bytes, key, value) {
            return Err(StorageError::CapacityExceeded);
        }
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist() {
            // Roll back the in-memory map so it keeps matching the file.
            match previous {
                Some(v) => self.entries.insert(key.to_string(), v),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_round_trip_and_remove() {
        let mut store = MemoryStore::new();
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap(), Some("1".to_string()));

        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        // Removing a missing key is not an error.
        store.remove("a").unwrap();
    }

    #[test]
    fn memory_keys_with_prefix() {
        let mut store = MemoryStore::new();
        store.set("cache_one", "1").unwrap();
        store.set("cache_two", "2").unwrap();
        store.set("users", "{}").unwrap();

        let keys = store.keys_with_prefix("cache_").unwrap();
        assert_eq!(keys, vec!["cache_one".to_string(), "cache_two".to_string()]);
    }

    #[test]
    fn memory_quota_rejects_oversized_write() {
        let mut store = MemoryStore::with_quota(10);
        store.set("k", "12345").unwrap(); // 6 bytes

        let err = store.set("x", "123456789").unwrap_err();
        assert!(matches!(err, StorageError::CapacityExceeded));
        // The rejected write left nothing behind.
        assert_eq!(store.get("x").unwrap(), None);
    }

    #[test]
    fn memory_quota_accounts_for_overwrites() {
        let mut store = MemoryStore::with_quota(10);
        store.set("k", "123456789").unwrap();
        // Replacing the value frees the old bytes first.
        store.set("k", "987654321").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("987654321".to_string()));
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("users", "{\"demo\":{}}").unwrap();
        store.set("cache_u", "{\"n\":1}").unwrap();
        drop(store);

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("users").unwrap(), Some("{\"demo\":{}}".to_string()));
        assert_eq!(store.len(), 2);
        // No temp file left behind by the atomic write.
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn file_store_quota_write_leaves_file_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let mut store = FileStore::open(&path).unwrap().with_quota(16);
        store.set("a", "1").unwrap();
        let err = store.set("big", "0123456789abcdef").unwrap_err();
        assert!(matches!(err, StorageError::CapacityExceeded));
        drop(store);

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("a").unwrap(), Some("1".to_string()));
        assert_eq!(store.get("big").unwrap(), None);
    }

    #[test]
    fn file_store_tolerates_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(store.is_empty());
    }
}
