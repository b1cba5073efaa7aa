//! Origin cache
//!
//! A key-value capability keyed by URL. The extractor client consults it
//! before going to the network and fills it after a successful extraction.
//!
//! Entries never expire and are never evicted. Anything implementing
//! [`Cache`] can be injected instead, for example a bounded or shared store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Key-value capability used by the extractor client
///
/// Implementations must be safe to share across crawl tasks: `set` may be
/// called concurrently from several tasks and must not race.
pub trait Cache<V>: Send + Sync {
    /// Returns a copy of the value stored under `key`, if any
    fn get(&self, key: &str) -> Option<V>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: V);
}

/// Unbounded in-process cache guarded by a read-write lock
#[derive(Debug)]
pub struct InMemoryCache<V> {
    entries: RwLock<HashMap<String, V>>,
}

impl<V> InMemoryCache<V> {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `key` has an entry
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }
}

impl<V> Default for InMemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Cache<V> for InMemoryCache<V>
where
    V: Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Option<V> {
        // A poisoned lock only means a writer panicked mid-insert; the map
        // itself is still usable.
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: V) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }
}
