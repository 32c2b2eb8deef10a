//! Fixed-capacity key/value store with FIFO eviction and hit/miss stats.
//!
//! Eviction is first-in-first-out over *insertion* order: `get` never
//! promotes an entry. The source system's cache behaves this way (despite
//! calling itself LRU) and downstream consumers depend on the deterministic
//! eviction order, so it is reproduced here verbatim rather than upgraded
//! to true LRU.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use serde::Serialize;
use tracing::debug;

use crate::CacheError;

// ---------------------------------------------------------------------------
// CacheConfig
// ---------------------------------------------------------------------------

/// Configuration for one [`BoundedCache`] instance.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries held at once.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 128 }
    }
}

impl CacheConfig {
    /// Config with the given capacity.
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }
}

// ---------------------------------------------------------------------------
// CacheStats
// ---------------------------------------------------------------------------

/// A point-in-time snapshot of cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups that found an entry.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// `hits / (hits + misses)`, or `0.0` before any lookup.
    pub hit_rate: f64,
    /// Number of entries currently stored.
    pub size: usize,
    /// Configured maximum number of entries.
    pub capacity: usize,
}

// ---------------------------------------------------------------------------
// BoundedCache
// ---------------------------------------------------------------------------

/// A fixed-capacity mapping with FIFO eviction over insertion order.
///
/// Values are immutable results; inserting under an existing key overwrites
/// the value without touching the key's eviction position.
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    entries: HashMap<K, V>,
    /// Keys in insertion order; the front is the eviction candidate.
    insertion_order: VecDeque<K>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidCapacity`] when the capacity is zero.
    pub fn new(config: CacheConfig) -> Result<Self, CacheError> {
        if config.capacity == 0 {
            return Err(CacheError::InvalidCapacity(
                "capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            entries: HashMap::with_capacity(config.capacity),
            insertion_order: VecDeque::with_capacity(config.capacity),
            capacity: config.capacity,
            hits: 0,
            misses: 0,
        })
    }

    /// Looks up a value, counting the hit or miss.
    ///
    /// Lookups never affect eviction order.
    pub fn get(&mut self, key: &K) -> Option<V> {
        match self.entries.get(key) {
            Some(value) => {
                self.hits += 1;
                debug!("cache hit");
                Some(value.clone())
            }
            None => {
                self.misses += 1;
                debug!("cache miss");
                None
            }
        }
    }

    /// Stores a value, evicting the oldest-inserted entry first when the
    /// cache is full and the key is new.
    ///
    /// An existing key keeps its insertion-order position; only its value
    /// is replaced.
    pub fn put(&mut self, key: K, value: V) {
        if self.entries.contains_key(&key) {
            self.entries.insert(key, value);
            return;
        }

        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.insertion_order.pop_front() {
                self.entries.remove(&oldest);
                debug!("evicted oldest-inserted entry");
            }
        }

        self.insertion_order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    /// Empties the cache and resets both counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.insertion_order.clear();
        self.hits = 0;
        self.misses = 0;
        debug!("cache cleared");
    }

    /// Returns the number of entries currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the cache has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a snapshot of the counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let total = self.hits + self.misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        };
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            hit_rate,
            size: self.entries.len(),
            capacity: self.capacity,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
