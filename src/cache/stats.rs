//! Cache Statistics Module
//!
//! Tracks store performance metrics including hits, misses, stale reads and evictions.

use serde::Serialize;

// == Cache Stats ==
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Fresh reads that found a value
    pub hits: u64,
    /// Fresh reads that found nothing (absent or expired)
    pub misses: u64,
    /// Expiry-ignoring reads that returned a value
    pub stale_hits: u64,
    /// Entries dropped to make room under the capacity limit
    pub evictions: u64,
    /// Entries dropped because their retention window lapsed
    pub purged: u64,
    /// Current number of entries, fresh and stale
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no fresh reads have been made.
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

    pub fn record_stale_hit(&mut self) {
        self.stale_hits += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_purged(&mut self, count: usize) {
        self.purged += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
