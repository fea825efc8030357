//! Cache Statistics Module
//!
//! Tracks hits, misses and evictions alongside current occupancy.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache activity and occupancy.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of successful `get` calls
    pub hits: u64,
    /// Number of `get` calls for absent keys or unreadable blobs
    pub misses: u64,
    /// Number of entries evicted to make room
    pub evictions: u64,
    /// Current number of resident entries
    pub total_entries: usize,
    /// Bytes held by resident entries
    pub size_used: u64,
    /// Configured capacity in bytes
    pub max_size: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates empty statistics with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Counts a `get` that returned a readable blob.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Counts a `get` for an absent key or an unreadable blob.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    /// Counts one entry evicted to make room.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}
