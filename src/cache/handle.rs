//! Cache Handle Module
//!
//! Owns the process-wide cache backend and remembers how it came to be:
//! connected as configured, or degraded to the in-memory store because the
//! configured backend was unreachable at startup.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::cache::{CacheBackend, CacheStore, MemoryBackend, RedisBackend};
use crate::config::Config;
use crate::error::CacheError;

/// Deadline for one cache operation unless configured otherwise.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(2);

// == Cache Mode ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CacheMode {
    /// Running on the configured backend
    Connected,
    /// Configured backend was unreachable; running on the in-memory fallback
    Degraded { reason: String },
}

/// Snapshot of cache health reported by `/api/health`.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    pub backend: &'static str,
    pub mode: CacheMode,
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// == Cache Handle ==
/// Cloneable, dependency-injected access to the cache backend.
#[derive(Clone)]
pub struct CacheHandle {
    backend: Arc<dyn CacheBackend>,
    mode: CacheMode,
    op_timeout: Duration,
    /// Set when the backend is in-process, so the sweeper can reach it
    memory: Option<MemoryBackend>,
}

impl CacheHandle {
    /// In-memory store, the default when no shared backend is configured.
    pub fn memory(max_entries: usize, stale_retention: u64) -> Self {
        let memory = MemoryBackend::new(max_entries, stale_retention);
        Self {
            backend: Arc::new(memory.clone()),
            mode: CacheMode::Connected,
            op_timeout: DEFAULT_OP_TIMEOUT,
            memory: Some(memory),
        }
    }

    /// Wraps an arbitrary backend.
    pub fn with_backend(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend,
            mode: CacheMode::Connected,
            op_timeout: DEFAULT_OP_TIMEOUT,
            memory: None,
        }
    }

    /// In-memory fallback standing in for an unreachable backend.
    pub fn degraded(max_entries: usize, stale_retention: u64, reason: impl Into<String>) -> Self {
        let mut handle = Self::memory(max_entries, stale_retention);
        handle.mode = CacheMode::Degraded {
            reason: reason.into(),
        };
        handle
    }

    /// Replaces the per-operation deadline.
    pub fn with_op_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = op_timeout;
        self
    }

    /// Builds the handle described by `config`.
    ///
    /// A Redis connection failure does not abort startup; it yields a degraded
    /// handle that the health endpoint reports.
    pub async fn from_config(config: &Config) -> Self {
        let Some(url) = config.redis_url.as_deref() else {
            info!(
                "Using in-memory cache (max_entries={}, stale_retention={}s)",
                config.max_entries, config.stale_retention
            );
            return Self::memory(config.max_entries, config.stale_retention)
                .with_op_timeout(config.cache_op_timeout());
        };

        let connect_timeout = Duration::from_secs(config.redis_connect_timeout);
        let handle = match RedisBackend::connect(
            url,
            config.stale_retention,
            connect_timeout,
            config.cache_op_timeout(),
        )
        .await
        {
            Ok(redis) => {
                info!("Connected to Redis cache");
                Self::with_backend(Arc::new(redis))
            }
            Err(err) => {
                warn!("Redis unavailable, running DEGRADED on in-memory cache: {}", err);
                Self::degraded(config.max_entries, config.stale_retention, err.to_string())
            }
        };
        handle.with_op_timeout(config.cache_op_timeout())
    }

    pub fn backend(&self) -> &dyn CacheBackend {
        self.backend.as_ref()
    }

    pub fn mode(&self) -> &CacheMode {
        &self.mode
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.mode, CacheMode::Degraded { .. })
    }

    /// The in-process store, if that is what backs this handle.
    pub fn memory_store(&self) -> Option<Arc<RwLock<CacheStore>>> {
        self.memory.as_ref().map(MemoryBackend::store)
    }

    pub fn op_timeout(&self) -> Duration {
        self.op_timeout
    }

    /// Runs one backend operation under the handle's deadline.
    ///
    /// A backend that stops answering yields [`CacheError::Unavailable`].
    pub async fn bounded<T, Fut>(&self, op: Fut) -> Result<T, CacheError>
    where
        Fut: Future<Output = Result<T, CacheError>>,
    {
        match tokio::time::timeout(self.op_timeout, op).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Unavailable(format!(
                "{} did not answer within {}ms",
                self.backend.name(),
                self.op_timeout.as_millis()
            ))),
        }
    }

    /// Pings the backend.
    pub async fn status(&self) -> CacheStatus {
        let ping = self.bounded(self.backend.ping()).await;
        CacheStatus {
            backend: self.backend.name(),
            mode: self.mode.clone(),
            reachable: ping.is_ok(),
            error: ping.err().map(|e| e.to_string()),
        }
    }

    /// Teardown hook for shutdown.
    pub async fn close(&self) {
        self.backend.close().await;
        info!("Cache backend '{}' closed", self.backend.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_handle_is_connected() {
        let handle = CacheHandle::memory(10, 60);
        assert!(!handle.is_degraded());
        assert!(handle.memory_store().is_some());

        let status = handle.status().await;
        assert_eq!(status.backend, "memory");
        assert!(status.reachable);
        assert_eq!(status.mode, CacheMode::Connected);
    }

    #[tokio::test]
    async fn test_degraded_handle_reports_reason() {
        let handle = CacheHandle::degraded(10, 60, "connection refused");
        assert!(handle.is_degraded());

        let status = handle.status().await;
        assert_eq!(
            status.mode,
            CacheMode::Degraded {
                reason: "connection refused".to_string()
            }
        );
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["mode"]["state"], "degraded");
        assert_eq!(json["mode"]["reason"], "connection refused");
    }

    #[tokio::test]
    async fn test_from_config_without_redis_uses_memory() {
        let handle = CacheHandle::from_config(&Config::default()).await;
        assert_eq!(handle.backend().name(), "memory");
        assert!(!handle.is_degraded());
        assert_eq!(handle.op_timeout(), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_bounded_times_out_hung_operation() {
        let handle = CacheHandle::memory(10, 60).with_op_timeout(Duration::from_millis(20));

        let result: Result<(), CacheError> = handle.bounded(std::future::pending()).await;
        assert!(matches!(result, Err(CacheError::Unavailable(msg)) if msg.contains("memory")));

        let value = handle.bounded(async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_from_config_with_bad_redis_url_degrades() {
        let config = Config {
            redis_url: Some("not a url".to_string()),
            ..Config::default()
        };
        let handle = CacheHandle::from_config(&config).await;
        assert!(handle.is_degraded());
        assert_eq!(handle.backend().name(), "memory");
    }
}
