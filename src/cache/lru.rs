//! LRU Tracker Module
//!
//! Least Recently Used bookkeeping for in-memory store eviction.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Tracks access order for the LRU eviction strategy.
///
/// Every touch stamps the key with a monotonically increasing tick; the
/// smallest tick is the eviction candidate. Touch, remove and evict are all
/// logarithmic in the number of tracked keys.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Key -> tick of its most recent access
    ticks: HashMap<String, u64>,
    /// Tick -> key, ordered oldest first
    order: BTreeMap<u64, String>,
    /// Next tick to hand out
    clock: u64,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used.
    pub fn touch(&mut self, key: &str) {
        let tick = self.clock;
        self.clock += 1;

        if let Some(previous) = self.ticks.insert(key.to_string(), tick) {
            self.order.remove(&previous);
        }
        self.order.insert(tick, key.to_string());
    }

    // == Remove ==
    /// Stops tracking a key.
    pub fn remove(&mut self, key: &str) {
        if let Some(tick) = self.ticks.remove(key) {
            self.order.remove(&tick);
        }
    }

    // == Evict Oldest ==
    /// Returns and forgets the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_orders_by_recency() {
        let mut lru = LruTracker::new();
        lru.touch("crypto_prices");
        lru.touch("stock_price:AAPL");
        lru.touch("weather:Paris:metric");

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.evict_oldest().as_deref(), Some("crypto_prices"));
        assert_eq!(lru.evict_oldest().as_deref(), Some("stock_price:AAPL"));
    }

    #[test]
    fn test_retouch_moves_key_to_back_of_queue() {
        let mut lru = LruTracker::new();
        lru.touch("a");
        lru.touch("b");
        lru.touch("a");

        assert_eq!(lru.len(), 2);
        assert_eq!(lru.evict_oldest().as_deref(), Some("b"));
        assert_eq!(lru.evict_oldest().as_deref(), Some("a"));
        assert!(lru.is_empty());
    }

    #[test]
    fn test_remove_forgets_key() {
        let mut lru = LruTracker::new();
        lru.touch("a");
        lru.touch("b");
        lru.remove("a");

        assert_eq!(lru.len(), 1);
        assert_eq!(lru.evict_oldest().as_deref(), Some("b"));
        assert!(lru.evict_oldest().is_none());
    }

    #[test]
    fn test_evict_empty() {
        let mut lru = LruTracker::new();
        assert!(lru.evict_oldest().is_none());
        assert!(lru.is_empty());
    }

    #[test]
    fn test_remove_unknown_key_is_noop() {
        let mut lru = LruTracker::new();
        lru.touch("a");
        lru.remove("missing");
        assert_eq!(lru.len(), 1);
    }
}
