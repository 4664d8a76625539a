//! Health and cache statistics.

use crate::cache::CacheHandle;
use crate::error::{AppError, Result};
use crate::models::{HealthResponse, StatsResponse};
use crate::upstream::Providers;

#[derive(Clone)]
pub struct HealthService {
    cache: CacheHandle,
    providers: Providers,
}

impl HealthService {
    pub fn new(cache: CacheHandle, providers: Providers) -> Self {
        Self { cache, providers }
    }

    pub async fn check(&self) -> HealthResponse {
        HealthResponse::new(self.cache.status().await, self.providers.configured())
    }

    /// Backends that keep no counters report `NotFound`.
    pub async fn stats(&self) -> Result<StatsResponse> {
        let backend = self.cache.backend();
        backend
            .stats()
            .await
            .map(|stats| StatsResponse::new(backend.name(), stats))
            .ok_or_else(|| {
                AppError::NotFound(format!("{} backend does not track statistics", backend.name()))
            })
    }
}
