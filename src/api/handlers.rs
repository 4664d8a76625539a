//! API Handlers
//!
//! Thin HTTP adapters over the data services. Every data endpoint reports
//! where its payload came from in the `x-cache-status` header.

use std::time::Duration;

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::HeaderValue,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::cache::CacheHandle;
use crate::config::Config;
use crate::error::Result;
use crate::fetch::{CacheAsideFetcher, Fetched};
use crate::models::{
    CoinMarket, CryptoPrices, HealthResponse, Headline, HistoryQuery, MarketsQuery, NewsQuery,
    RefreshResponse, RootResponse, StatsResponse, StockHistoryResponse, StockPriceResponse,
    StockQuery, UsdRates, WeatherQuery, WeatherReport,
};
use crate::services::Services;
use crate::upstream::{http::build_client, Providers};

/// Header carrying the fetch outcome of a data response.
pub const CACHE_STATUS_HEADER: &str = "x-cache-status";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: CacheHandle,
    pub services: Services,
}

impl AppState {
    /// Wires services to an existing cache handle and provider set.
    pub fn new(cache: CacheHandle, providers: Providers, upstream_timeout: Duration) -> Self {
        let fetcher = CacheAsideFetcher::new(cache.clone(), upstream_timeout);
        Self {
            services: Services::new(fetcher, providers),
            cache,
        }
    }

    /// Creates the state described by the configuration.
    ///
    /// Connects the cache backend (degrading to memory if it is unreachable)
    /// and builds the shared HTTP client for every provider.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let cache = CacheHandle::from_config(config).await;
        let client = build_client(config.upstream_timeout())
            .context("Failed to build the upstream HTTP client")?;
        let providers = Providers::from_keys(client, &config.api_keys);

        Ok(Self::new(cache, providers, config.upstream_timeout()))
    }
}

// == Cached Response ==
/// JSON body plus the `x-cache-status` header.
pub struct Cached<T>(pub Fetched<T>);

impl<T: Serialize> IntoResponse for Cached<T> {
    fn into_response(self) -> Response {
        let Fetched { data, outcome } = self.0;
        let mut response = Json(data).into_response();
        response.headers_mut().insert(
            CACHE_STATUS_HEADER,
            HeaderValue::from_static(outcome.as_str()),
        );
        response
    }
}

/// Handler for GET /
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse::new())
}

/// Handler for GET /api/health
///
/// Always 200; a degraded cache is reported in the body.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(state.services.health.check().await)
}

/// Handler for GET /api/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    state.services.health.stats().await.map(Json)
}

/// Handler for GET /api/crypto
pub async fn crypto_handler(State(state): State<AppState>) -> Result<Cached<CryptoPrices>> {
    state.services.crypto.prices().await.map(Cached)
}

/// Handler for GET /api/crypto/markets
pub async fn markets_handler(
    State(state): State<AppState>,
    Query(query): Query<MarketsQuery>,
) -> Result<Cached<Vec<CoinMarket>>> {
    state.services.crypto.markets(&query).await.map(Cached)
}

/// Handler for GET /api/stocks
pub async fn stock_handler(
    State(state): State<AppState>,
    Query(query): Query<StockQuery>,
) -> Result<Cached<StockPriceResponse>> {
    state
        .services
        .stocks
        .price(query.symbol.as_deref())
        .await
        .map(Cached)
}

/// Handler for GET /api/stocks/historical/:symbol
pub async fn history_handler(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Cached<StockHistoryResponse>> {
    state
        .services
        .stocks
        .history(&symbol, query.period.as_deref())
        .await
        .map(Cached)
}

/// Handler for GET /api/weather
pub async fn weather_handler(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Result<Cached<WeatherReport>> {
    state.services.weather.current(&query).await.map(Cached)
}

/// Handler for GET /api/news
pub async fn news_handler(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> Result<Cached<Vec<Headline>>> {
    state
        .services
        .news
        .headlines(query.category.as_deref())
        .await
        .map(Cached)
}

/// Handler for GET /api/exchange-rate
pub async fn exchange_handler(State(state): State<AppState>) -> Result<Cached<UsdRates>> {
    state.services.exchange.usd_rates().await.map(Cached)
}

/// Handler for POST /api/refresh
pub async fn refresh_all_handler(State(state): State<AppState>) -> Json<RefreshResponse> {
    let results = state.services.refresh.refresh_all().await;
    Json(RefreshResponse::new(results))
}

/// Handler for POST /api/refresh/:source
pub async fn refresh_source_handler(
    State(state): State<AppState>,
    Path(source): Path<String>,
) -> Result<Json<RefreshResponse>> {
    let results = state.services.refresh.refresh_one(&source).await?;
    Ok(Json(RefreshResponse::new(results)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchOutcome;
    use axum::http::StatusCode;

    fn test_state() -> AppState {
        let providers = Providers::from_keys(reqwest::Client::new(), &Default::default());
        AppState::new(
            CacheHandle::memory(100, 300),
            providers,
            Duration::from_secs(1),
        )
    }

    #[test]
    fn test_cached_sets_header() {
        let response = Cached(Fetched::new(1.5, FetchOutcome::Stale)).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CACHE_STATUS_HEADER], "stale");
    }

    #[tokio::test]
    async fn test_root_handler() {
        let Json(resp) = root_handler().await;
        assert_eq!(resp.message, "DataPulse API");
    }

    #[tokio::test]
    async fn test_stats_handler_memory() {
        let state = test_state();
        let Json(resp) = stats_handler(State(state)).await.unwrap();
        assert_eq!(resp.backend, "memory");
        assert_eq!(resp.stats.hits, 0);
    }

    #[tokio::test]
    async fn test_health_handler_reports_unconfigured_providers() {
        let state = test_state();
        let Json(resp) = health_handler(State(state)).await;
        assert_eq!(resp.status, "healthy");
        assert_eq!(resp.providers["stocks"], false);
    }

    #[tokio::test]
    async fn test_stock_handler_missing_symbol() {
        let state = test_state();
        let result = stock_handler(State(state), Query(StockQuery::default())).await;
        assert!(matches!(result, Err(crate::error::AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_refresh_unknown_source() {
        let state = test_state();
        let result = refresh_source_handler(State(state), Path("stonks".to_string())).await;
        assert!(matches!(result, Err(crate::error::AppError::NotFound(_))));
    }
}
