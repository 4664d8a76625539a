//! Response DTOs for the DataPulse API
//!
//! Defines the structure of outgoing HTTP response bodies that are not plain
//! feed payloads.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cache::{CacheStats, CacheStatus};
use crate::models::StockHistory;

/// Response body for `GET /`
#[derive(Debug, Clone, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub version: &'static str,
}

impl RootResponse {
    pub fn new() -> Self {
        Self {
            message: "DataPulse API",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

impl Default for RootResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response body for `GET /api/stocks`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockPriceResponse {
    pub symbol: String,
    pub price: f64,
}

/// Response body for `GET /api/stocks/historical/:symbol`
#[derive(Debug, Clone, Serialize)]
pub struct StockHistoryResponse {
    pub symbol: String,
    pub period: String,
    #[serde(flatten)]
    pub history: StockHistory,
}

/// Response body for `GET /api/cache/stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub backend: &'static str,
    #[serde(flatten)]
    pub stats: CacheStats,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(backend: &'static str, stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self {
            backend,
            stats,
            hit_rate,
        }
    }
}

/// Response body for `GET /api/health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: &'static str,
    pub cache: CacheStatus,
    /// Which providers have credentials configured
    pub providers: BTreeMap<&'static str, bool>,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn new(cache: CacheStatus, providers: BTreeMap<&'static str, bool>) -> Self {
        let healthy = cache.reachable && cache.mode == crate::cache::CacheMode::Connected;
        Self {
            status: if healthy { "healthy" } else { "degraded" },
            cache,
            providers,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for `POST /api/refresh`
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    pub message: &'static str,
    /// Per source: "success" or "error: <reason>"
    pub results: BTreeMap<String, String>,
    pub timestamp: String,
}

impl RefreshResponse {
    pub fn new(results: BTreeMap<String, String>) -> Self {
        Self {
            message: "Data refresh completed",
            results,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
