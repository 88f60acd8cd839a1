// Cache store for upstream responses.
// Entries are keyed by request URL and carry a write timestamp; an entry is
// served only while younger than the fixed TTL. Expired and unparsable
// entries are deleted where they are found, and a full store is handled by
// sweeping expired entries once and otherwise dropping the write.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{self, storage_keys};

use super::storage::{KeyValueStore, StorageError};

/// A stored response with its write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Epoch milliseconds at write time.
    pub timestamp: i64,
    /// The upstream response body, kept opaque.
    pub content: Value,
}

/// Result of a cache write. Writes never fail the caller; a dropped write
/// just means the next lookup is a miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    Stored,
    Dropped,
}

fn ttl_ms() -> i64 {
    config::CACHE_TTL.as_millis() as i64
}

/// Storage key for a request URL.
pub fn cache_key(url: &str) -> String {
    format!("{}{}", storage_keys::CACHE_PREFIX, url)
}

/// Look up a fresh entry for `url`.
///
/// Expired and unparsable entries are removed and reported as a miss.
/// `Err` means the underlying store itself failed; callers treat that the
/// same as a miss.
pub fn get(store: &mut impl KeyValueStore, url: &str) -> Result<Option<Value>, StorageError> {
    let key = cache_key(url);
    let Some(raw) = store.get(&key)? else {
        return Ok(None);
    };

    let entry: CacheEntry = match serde_json::from_str(&raw) {
        Ok(entry) => entry,
        Err(_) => {
            // Corrupt entry: remove it and report a miss.
            store.remove(&key)?;
            return Ok(None);
        }
    };

    if Utc::now().timestamp_millis() - entry.timestamp >= ttl_ms() {
        store.remove(&key)?;
        return Ok(None);
    }

    Ok(Some(entry.content))
}

/// Write `content` for `url`, stamped with the current time.
///
/// On a full store one expiry sweep runs and the write is retried once; if
/// it still does not fit it is dropped.
pub fn put(store: &mut impl KeyValueStore, url: &str, content: &Value) -> PutOutcome {
    let entry = CacheEntry {
        timestamp: Utc::now().timestamp_millis(),
        content: content.clone(),
    };
    let raw = match serde_json::to_string(&entry) {
        Ok(raw) => raw,
        Err(_) => return PutOutcome::Dropped,
    };
    let key = cache_key(url);

    match store.set(&key, &raw) {
        Ok(()) => PutOutcome::Stored,
        Err(StorageError::CapacityExceeded) => {
            evict_expired(store);
            match store.set(&key, &raw) {
                Ok(()) => PutOutcome::Stored,
                Err(_) => PutOutcome::Dropped,
            }
        }
        Err(_) => PutOutcome::Dropped,
    }
}

/// Remove every expired or unparsable entry under the cache prefix.
/// Returns the number of entries removed.
pub fn evict_expired(store: &mut impl KeyValueStore) -> usize {
    let keys = match store.keys_with_prefix(storage_keys::CACHE_PREFIX) {
        Ok(keys) => keys,
        Err(_) => return 0,
    };

    let now = Utc::now().timestamp_millis();
    let mut removed = 0;
    for key in keys {
        let stale = match store.get(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<CacheEntry>(&raw) {
                Ok(entry) => now - entry.timestamp > ttl_ms(),
                Err(_) => true, // corrupt
            },
            _ => false,
        };
        if stale && store.remove(&key).is_ok() {
            removed += 1;
        }
    }
    removed
}
