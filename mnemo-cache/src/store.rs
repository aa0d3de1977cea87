//! In-memory entry store with absolute-expiry TTL.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use mnemo_core::key::CacheKey;

/// Cache entry: a memoized value and its absolute expiry timestamp.
///
/// The value is opaque to the store; it is kept and returned verbatim.
#[derive(Clone, Debug)]
struct CacheEntry<V> {
    value: V,
    expires_at: i64,
}

impl<V> CacheEntry<V> {
    /// An entry is valid iff strictly before its expiry instant.
    /// A call at exactly `expires_at` observes an expired entry.
    fn is_valid_at(&self, now: i64) -> bool {
        self.expires_at - now > 0
    }
}

/// Mapping from cache key to entry, owned by a single memoized wrapper.
///
/// All mutations (single-entry writes and the guard's whole-store clear) go
/// through the write lock, so a clear can never interleave with a
/// partially-completed read-modify-write from the call path.
#[derive(Debug)]
pub struct EntryStore<V> {
    entries: RwLock<HashMap<CacheKey, CacheEntry<V>>>,
}

impl<V: Clone> EntryStore<V> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the value for `key` if an entry exists and is still valid
    /// at `now`.
    ///
    /// An expired entry is dropped lazily on read.
    pub fn get_valid(&self, key: &CacheKey, now: i64) -> Option<V> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if entry.is_valid_at(now) => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Re-check under the write lock: the entry may have been replaced
        // by a fresh one since the read lock was released.
        let mut entries = self.entries.write();
        if let Some(entry) = entries.get(key) {
            if entry.is_valid_at(now) {
                return Some(entry.value.clone());
            }
            entries.remove(key);
            debug!(%key, "Dropped expired entry");
        }
        None
    }

    /// Writes an entry, fully replacing any previous entry for the key.
    pub fn insert(&self, key: CacheKey, value: V, expires_at: i64) {
        debug!(%key, expires_at, "Caching entry");
        self.entries
            .write()
            .insert(key, CacheEntry { value, expires_at });
    }

    /// Removes the entry for a key, if present.
    pub fn remove(&self, key: &CacheKey) {
        self.entries.write().remove(key);
    }

    /// Clears every entry unconditionally, regardless of individual TTLs.
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        let dropped = entries.len();
        entries.clear();
        debug!(dropped, "Cleared store");
    }

    /// Removes all entries that are expired at `now`.
    pub fn cleanup_expired(&self, now: i64) {
        self.entries.write().retain(|_, e| e.is_valid_at(now));
    }

    /// Returns the number of stored entries, including expired ones not
    /// yet lazily dropped.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns store statistics as of `now`.
    pub fn stats(&self, now: i64) -> CacheStats {
        let entries = self.entries.read();
        let expired = entries.values().filter(|e| !e.is_valid_at(now)).count();
        CacheStats {
            total_entries: entries.len(),
            expired_entries: expired,
            valid_entries: entries.len().saturating_sub(expired),
        }
    }
}

impl<V: Clone> Default for EntryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Store statistics.
#[derive(Clone, Debug)]
pub struct CacheStats {
    /// Total entries (including expired ones not yet dropped)
    pub total_entries: usize,
    /// Expired entries
    pub expired_entries: usize,
    /// Valid (non-expired) entries
    pub valid_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> CacheKey {
        CacheKey::new(s)
    }

    #[test]
    fn test_store_insert_get() {
        let store = EntryStore::new();
        store.insert(key("a"), 5, 1_000);
        assert_eq!(store.get_valid(&key("a"), 500), Some(5));
    }

    #[test]
    fn test_store_miss() {
        let store: EntryStore<i32> = EntryStore::new();
        assert_eq!(store.get_valid(&key("missing"), 0), None);
    }

    #[test]
    fn test_store_expiry_is_strict() {
        let store = EntryStore::new();
        store.insert(key("a"), 5, 1_000);

        // remaining = 1 is valid, remaining = 0 is expired
        assert_eq!(store.get_valid(&key("a"), 999), Some(5));
        assert_eq!(store.get_valid(&key("a"), 1_000), None);
    }

    #[test]
    fn test_expired_entry_dropped_lazily() {
        let store = EntryStore::new();
        store.insert(key("a"), 5, 1_000);
        assert_eq!(store.len(), 1);

        assert_eq!(store.get_valid(&key("a"), 2_000), None);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_insert_replaces_whole_entry() {
        let store = EntryStore::new();
        store.insert(key("a"), 5, 1_000);
        store.insert(key("a"), 7, 3_000);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get_valid(&key("a"), 2_000), Some(7));
    }

    #[test]
    fn test_keys_are_isolated() {
        let store = EntryStore::new();
        store.insert(key("a"), 1, 1_000);
        store.insert(key("b"), 2, 1_000);

        assert_eq!(store.get_valid(&key("a"), 0), Some(1));
        assert_eq!(store.get_valid(&key("b"), 0), Some(2));
    }

    #[test]
    fn test_clear_drops_unexpired_entries() {
        let store = EntryStore::new();
        store.insert(key("a"), 1, i64::MAX);
        store.insert(key("b"), 2, i64::MAX);

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_cleanup_expired() {
        let store = EntryStore::new();
        store.insert(key("old"), 1, 100);
        store.insert(key("fresh"), 2, 10_000);

        store.cleanup_expired(5_000);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_valid(&key("fresh"), 5_000), Some(2));
    }

    #[test]
    fn test_stats() {
        let store = EntryStore::new();
        store.insert(key("old"), 1, 100);
        store.insert(key("fresh"), 2, 10_000);

        let stats = store.stats(5_000);
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.expired_entries, 1);
        assert_eq!(stats.valid_entries, 1);
    }
}
