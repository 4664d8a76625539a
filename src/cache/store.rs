//! Cache Store Module
//!
//! In-process cache engine combining HashMap storage with LRU tracking, TTL
//! expiration and a stale retention window.

use std::collections::HashMap;

use crate::cache::{CacheEntry, CacheStats, LruTracker, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::CacheError;

type Result<T> = std::result::Result<T, CacheError>;

// == Cache Store ==
/// Main cache storage with LRU eviction and TTL support.
///
/// Expired entries are not dropped on read. They stay available to
/// [`CacheStore::get_stale`] until their retention window lapses and
/// [`CacheStore::purge_stale`] sweeps them.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Seconds an entry stays readable after expiring
    stale_retention: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries the cache can hold
    /// * `stale_retention` - Seconds expired entries remain available for stale reads
    pub fn new(max_entries: usize, stale_retention: u64) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            stale_retention,
        }
    }

    // == Set ==
    /// Stores a key-value pair, overwriting any previous value and resetting its TTL.
    ///
    /// If the cache is at capacity, the least recently used entry is evicted.
    pub fn set(&mut self, key: String, value: String, ttl: u64) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
        }

        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::InvalidRequest(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.max_entries {
            match self.lru.evict_oldest() {
                Some(evicted_key) => {
                    self.entries.remove(&evicted_key);
                    self.stats.record_eviction();
                }
                None => {
                    return Err(CacheError::CacheFull(
                        "Cache is full and eviction failed".to_string(),
                    ));
                }
            }
        }

        let entry = CacheEntry::new(value, ttl, self.stale_retention);
        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());

        Ok(())
    }

    // == Get ==
    /// Retrieves a fresh value by key.
    ///
    /// Expired entries count as misses but are kept for stale reads.
    pub fn get(&mut self, key: &str) -> Result<String> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return Err(CacheError::NotFound(key.to_string()));
        };

        if entry.is_expired() {
            self.stats.record_miss();
            return Err(CacheError::Expired(key.to_string()));
        }

        let value = entry.value.clone();
        self.stats.record_hit();
        self.lru.touch(key);
        Ok(value)
    }

    // == Get Stale ==
    /// Retrieves the most recent value for a key, ignoring expiry.
    ///
    /// Returns `None` once the entry's retention window has lapsed, which is
    /// indistinguishable from the key never having been written.
    pub fn get_stale(&mut self, key: &str) -> Option<String> {
        let purgeable = self.entries.get(key)?.is_purgeable();
        if purgeable {
            self.remove_entry(key);
            self.stats.record_purged(1);
            return None;
        }

        self.stats.record_stale_hit();
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Delete Prefix ==
    /// Removes every entry, fresh or stale, whose key starts with `prefix`.
    ///
    /// Returns the number of entries removed.
    pub fn delete_prefix(&mut self, prefix: &str) -> usize {
        let matching: Vec<String> = self
            .entries
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();

        for key in &matching {
            self.remove_entry(key);
        }
        matching.len()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Purge Stale ==
    /// Removes all entries whose retention window has lapsed.
    ///
    /// Returns the number of entries removed.
    pub fn purge_stale(&mut self) -> usize {
        let purgeable: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_purgeable())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &purgeable {
            self.remove_entry(key);
        }

        self.stats.record_purged(purgeable.len());
        purgeable.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_entry(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }
    }
}
