//! Cache Statistics Module
//!
//! Tracks lookups, writes and every way an entry can leave the cache.

use serde::Serialize;

use crate::cache::RemovalCause;

// == Cache Stats ==
/// Cache performance counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups that returned a live value
    pub hits: u64,
    /// Lookups for absent or expired keys
    pub misses: u64,
    /// New keys written
    pub insertions: u64,
    /// Existing keys overwritten in place
    pub updates: u64,
    /// Entries evicted by the capacity bound
    pub evictions: u64,
    /// Entries reclaimed after their TTL, lazily or by the sweeper
    pub expirations: u64,
    /// Entries removed by an explicit `remove`
    pub removals: u64,
    /// Entries dropped by `flush_all`
    pub flushed: u64,
    /// Entries currently stored, expired-but-unreclaimed included
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
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

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    // == Record Removal ==
    /// Counts one entry leaving the cache for `cause`.
    pub fn record_removal(&mut self, cause: RemovalCause) {
        match cause {
            RemovalCause::Size => self.evictions += 1,
            RemovalCause::Expired => self.expirations += 1,
            RemovalCause::Explicit => self.removals += 1,
            RemovalCause::Flushed => self.flushed += 1,
        }
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
