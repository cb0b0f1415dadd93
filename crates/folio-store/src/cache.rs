use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::StoreResult;

/// Durable key-value store private to the running client.
///
/// The local cache is the last-resort source of truth: everything published
/// through Folio is also written here, so public data stays readable with no
/// working remote provider. Implementations must satisfy:
/// - Each key is written independently; there are no cross-key transactions.
/// - `set` replaces any previous value for the key.
/// - Reads of a missing key return `Ok(None)`, never an error.
pub trait LocalCache: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Remove `key`. Returns `true` if it was present.
    fn remove(&self, key: &str) -> StoreResult<bool>;

    /// All keys starting with `prefix`, sorted.
    fn keys(&self, prefix: &str) -> StoreResult<Vec<String>>;

    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// In-memory, HashMap-based cache.
///
/// Intended for tests and short-lived processes. Values are cloned on
/// read/write and lost when the cache is dropped.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    /// Remove every key.
    pub fn clear(&self) {
        self.entries.write().expect("lock poisoned").clear();
    }
}

impl LocalCache for MemoryCache {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let map = self.entries.read().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut map = self.entries.write().expect("lock poisoned");
        map.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let mut map = self.entries.write().expect("lock poisoned");
        Ok(map.remove(key).is_some())
    }

    fn keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let map = self.entries.read().expect("lock poisoned");
        let mut keys: Vec<String> = map
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("key_count", &self.len())
            .finish()
    }
}
