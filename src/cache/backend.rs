//! Cache Backend Module
//!
//! The async storage interface the fetcher talks to, plus the in-process
//! implementation built on [`CacheStore`].

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheStats, CacheStore};
use crate::error::CacheError;

/// Expiring key-value storage shared by every data service.
///
/// Every operation may fail. Callers treat a failure as a cache miss.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Short name used in logs and the health report.
    fn name(&self) -> &'static str;

    /// Returns the value if present and not expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Returns the most recent value even if expired, as long as it is still retained.
    async fn get_ignoring_expiry(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Overwrites `key` unconditionally; expiry counts from now.
    async fn set_with_ttl(&self, key: &str, value: String, ttl_secs: u64)
        -> Result<(), CacheError>;

    /// Deletes every key starting with `prefix`; returns how many were removed.
    async fn delete_by_prefix(&self, prefix: &str) -> Result<usize, CacheError>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), CacheError>;

    /// Counters, for backends that keep them.
    async fn stats(&self) -> Option<CacheStats> {
        None
    }

    /// Releases backend resources. Must not fail.
    async fn close(&self) {}
}

// == Memory Backend ==
/// In-process backend: a [`CacheStore`] behind a tokio `RwLock`.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    store: Arc<RwLock<CacheStore>>,
}

impl MemoryBackend {
    pub fn new(max_entries: usize, stale_retention: u64) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(max_entries, stale_retention))),
        }
    }

    /// Shared handle to the underlying store, used by the retention sweeper.
    pub fn store(&self) -> Arc<RwLock<CacheStore>> {
        self.store.clone()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        // Write lock: reads update LRU order and stats
        let mut store = self.store.write().await;
        match store.get(key) {
            Ok(value) => Ok(Some(value)),
            Err(CacheError::NotFound(_)) | Err(CacheError::Expired(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn get_ignoring_expiry(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut store = self.store.write().await;
        Ok(store.get_stale(key))
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: String,
        ttl_secs: u64,
    ) -> Result<(), CacheError> {
        let mut store = self.store.write().await;
        store.set(key.to_string(), value, ttl_secs)
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        let mut store = self.store.write().await;
        Ok(store.delete_prefix(prefix))
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }

    async fn stats(&self) -> Option<CacheStats> {
        Some(self.store.read().await.stats())
    }
}
