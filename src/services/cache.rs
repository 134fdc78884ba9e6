use dashmap::DashMap;
use std::time::{Duration, Instant};

/// A thread-safe cache whose entries expire a fixed time after insertion.
///
/// Expired entries are dropped lazily when looked up.
pub struct Cache<V> {
    data: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
}

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.duration_since(self.inserted_at) < ttl
    }
}

impl<V: Clone> Cache<V> {
    /// Create a new cache with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a value, evicting it if it has outlived the TTL.
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = self.data.get(key)?;
        if entry.is_fresh(Instant::now(), self.ttl) {
            Some(entry.value.clone())
        } else {
            drop(entry);
            self.data.remove(key);
            None
        }
    }

    /// Insert or replace a value, restarting its TTL.
    pub fn insert(&self, key: String, value: V) {
        self.data.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of entries still within the TTL.
    pub fn active_len(&self) -> usize {
        let now = Instant::now();
        self.data
            .iter()
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .count()
    }

    /// Remove every entry, returning how many were stored.
    pub fn clear(&self) -> usize {
        let count = self.data.len();
        self.data.clear();
        count
    }
}
