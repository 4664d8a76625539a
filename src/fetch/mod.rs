//! Cache-Aside Fetcher
//!
//! The one algorithm every data source shares:
//!
//! 1. fresh cache read, returned as [`FetchOutcome::Fresh`];
//! 2. otherwise the upstream call, bounded by a timeout;
//! 3. a valid upstream payload is written back and returned as [`FetchOutcome::Refreshed`];
//! 4. on upstream failure, a read ignoring expiry, returned as [`FetchOutcome::Stale`];
//! 5. with nothing left, [`AppError::NoDataAvailable`].
//!
//! Cache failures never escape: a broken store behaves like an empty one, and
//! every store call is bounded by the handle's operation deadline so a hung
//! store behaves like a broken one.
//!
//! Concurrent misses on the same key are not coalesced: N callers racing on a
//! cold key make N upstream calls and the last write wins.

mod outcome;
mod policy;

pub use outcome::{FetchOutcome, Fetched};
pub use policy::{keys, FetchPolicy, Source};

use std::future::Future;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::cache::CacheHandle;
use crate::error::{AppError, UpstreamError};

// == Cache-Aside Fetcher ==
#[derive(Clone)]
pub struct CacheAsideFetcher {
    cache: CacheHandle,
    upstream_timeout: Duration,
}

impl CacheAsideFetcher {
    pub fn new(cache: CacheHandle, upstream_timeout: Duration) -> Self {
        Self {
            cache,
            upstream_timeout,
        }
    }

    pub fn cache(&self) -> &CacheHandle {
        &self.cache
    }

    // == Fetch ==
    /// Returns data for `key`, consulting the cache before `upstream`.
    ///
    /// `upstream` is only invoked after a fresh-cache miss. If it does not
    /// finish within the upstream timeout its future is dropped, which aborts
    /// the request, and nothing is written to the cache.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: &str,
        policy: &FetchPolicy<T>,
        upstream: F,
    ) -> Result<Fetched<T>, AppError>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, UpstreamError>>,
    {
        if let Some(data) = self.read_fresh::<T>(key).await {
            debug!("Cache hit for {}", key);
            return Ok(Fetched::new(data, FetchOutcome::Fresh));
        }

        let cause = match tokio::time::timeout(self.upstream_timeout, upstream()).await {
            Ok(Ok(data)) if policy.is_valid(&data) => {
                self.write(key, &data, policy.ttl).await;
                info!("Refreshed {} from upstream", key);
                return Ok(Fetched::new(data, FetchOutcome::Refreshed));
            }
            Ok(Ok(_)) => UpstreamError::InvalidResponse(format!(
                "payload for {} failed validation",
                key
            )),
            Ok(Err(err)) => err,
            Err(_) => UpstreamError::Timeout,
        };

        warn!("Upstream failed for {}: {}", key, cause);

        match self.read_stale::<T>(key).await {
            Some(data) => {
                warn!("Serving stale cache for {}", key);
                Ok(Fetched::new(data, FetchOutcome::Stale))
            }
            None => Err(AppError::NoDataAvailable {
                key: key.to_string(),
                cause,
            }),
        }
    }

    // == Invalidate ==
    /// Deletes every entry under the given prefixes; returns how many went.
    ///
    /// Store failures are logged and count as nothing deleted.
    pub async fn invalidate(&self, prefixes: &[&str]) -> usize {
        let mut removed = 0;
        for prefix in prefixes {
            let deleted = self
                .cache
                .bounded(self.cache.backend().delete_by_prefix(prefix))
                .await;
            match deleted {
                Ok(count) => removed += count,
                Err(err) => warn!("Failed to invalidate '{}*': {}", prefix, err),
            }
        }
        info!("Invalidated {} cache entries under {:?}", removed, prefixes);
        removed
    }

    async fn read_fresh<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.bounded(self.cache.backend().get(key)).await {
            Ok(Some(raw)) => decode(key, &raw),
            Ok(None) => None,
            Err(err) => {
                warn!("Cache read failed for {}, treating as miss: {}", key, err);
                None
            }
        }
    }

    async fn read_stale<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let read = self
            .cache
            .bounded(self.cache.backend().get_ignoring_expiry(key))
            .await;
        match read {
            Ok(Some(raw)) => decode(key, &raw),
            Ok(None) => None,
            Err(err) => {
                warn!("Stale cache read failed for {}: {}", key, err);
                None
            }
        }
    }

    /// Best-effort write; a failure only costs the next caller a cache hit.
    async fn write<T: Serialize>(&self, key: &str, data: &T, ttl: u64) {
        let raw = match serde_json::to_string(data) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("Could not encode {} for caching: {}", key, err);
                return;
            }
        };

        let written = self
            .cache
            .bounded(self.cache.backend().set_with_ttl(key, raw, ttl))
            .await;
        if let Err(err) = written {
            warn!("Cache write failed for {}: {}", key, err);
        }
    }
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(data) => Some(data),
        Err(err) => {
            warn!("Discarding undecodable cache entry {}: {}", key, err);
            None
        }
    }
}
