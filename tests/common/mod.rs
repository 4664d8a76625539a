//! Shared test doubles: a scriptable upstream and cache backends that fail or hang.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{body::Body, Router};
use serde_json::Value;

use datapulse::api::{create_router, AppState};
use datapulse::cache::{CacheBackend, CacheHandle};
use datapulse::error::{CacheError, UpstreamError};
use datapulse::models::{
    CoinMarket, CryptoPrices, Headline, Period, StockHistory, Topic, Units, UsdRates,
    WeatherReport,
};
use datapulse::upstream::{
    CryptoProvider, ExchangeRateProvider, NewsProvider, Providers, StockProvider,
    WeatherProvider,
};

// == Fake Upstream ==

/// Answers every provider trait with canned data unless told to fail.
#[derive(Default)]
pub struct FakeUpstream {
    calls: AtomicUsize,
    failure: Mutex<Option<fn() -> UpstreamError>>,
    delay: Mutex<Option<Duration>>,
    last_request: Mutex<Option<String>>,
}

impl FakeUpstream {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every subsequent call fails with the error `make` builds.
    pub fn fail_with(&self, make: fn() -> UpstreamError) {
        *self.failure.lock().unwrap() = Some(make);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Description of the most recent call, e.g. `"weather Paris imperial"`.
    pub fn last_request(&self) -> Option<String> {
        self.last_request.lock().unwrap().clone()
    }

    pub fn providers(self: &Arc<Self>) -> Providers {
        Providers {
            crypto: self.clone(),
            stocks: self.clone(),
            weather: self.clone(),
            news: self.clone(),
            exchange: self.clone(),
        }
    }

    async fn answer<T>(&self, request: String, data: T) -> Result<T, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = *self.failure.lock().unwrap();
        match failure {
            Some(make) => Err(make()),
            None => Ok(data),
        }
    }
}

pub fn headline(title: &str) -> Headline {
    Headline {
        title: title.to_string(),
        source: "Wire".to_string(),
        url: format!("https://news.test/{}", title.replace(' ', "-")),
        published_at: "2024-05-01T12:00:00Z".to_string(),
        image: None,
        description: None,
        category: None,
    }
}

#[async_trait]
impl CryptoProvider for FakeUpstream {
    fn is_configured(&self) -> bool {
        true
    }

    async fn spot_prices(&self) -> Result<CryptoPrices, UpstreamError> {
        let prices = CryptoPrices {
            btc: 65_000.0,
            eth: 3_200.0,
        };
        self.answer("crypto prices".into(), prices).await
    }

    async fn markets(&self, limit: u16) -> Result<Vec<CoinMarket>, UpstreamError> {
        let markets = (1..=limit.min(3))
            .map(|rank| CoinMarket {
                id: format!("coin-{rank}"),
                symbol: format!("c{rank}"),
                name: format!("Coin {rank}"),
                image: None,
                current_price: 100.0 / f64::from(rank),
                market_cap: None,
                market_cap_rank: Some(u32::from(rank)),
                price_change_percentage_24h: None,
            })
            .collect();
        self.answer(format!("crypto markets {limit}"), markets).await
    }
}

#[async_trait]
impl StockProvider for FakeUpstream {
    fn is_configured(&self) -> bool {
        true
    }

    async fn quote(&self, symbol: &str) -> Result<f64, UpstreamError> {
        if symbol == "NOPE" {
            self.calls.fetch_add(1, Ordering::SeqCst);
            return Err(UpstreamError::NotFound(format!("Symbol not found: {symbol}")));
        }
        self.answer(format!("quote {symbol}"), 189.30).await
    }

    async fn candles(&self, symbol: &str, period: Period) -> Result<StockHistory, UpstreamError> {
        let history = StockHistory {
            resolution: period.resolution().to_string(),
            timestamps: vec![1_714_560_000, 1_714_560_300],
            open: vec![189.0, 189.5],
            high: vec![190.0, 190.2],
            low: vec![188.7, 189.1],
            close: vec![189.5, 190.0],
            volume: vec![1_000.0, 1_200.0],
        };
        self.answer(format!("candles {symbol} {}", period.label()), history)
            .await
    }
}

#[async_trait]
impl WeatherProvider for FakeUpstream {
    fn is_configured(&self) -> bool {
        true
    }

    async fn current(&self, city: &str, units: Units) -> Result<WeatherReport, UpstreamError> {
        let report = WeatherReport {
            city: city.to_string(),
            temp: 21,
            desc: "Clear Sky".to_string(),
            icon: "01d".to_string(),
            humidity: 40,
            wind_speed: 3.5,
            feels_like: 20,
            pressure: 1013,
            visibility: 10.0,
        };
        self.answer(format!("weather {city} {}", units.as_str()), report)
            .await
    }
}

#[async_trait]
impl NewsProvider for FakeUpstream {
    fn is_configured(&self) -> bool {
        true
    }

    async fn top_headlines(&self) -> Result<Vec<Headline>, UpstreamError> {
        let headlines = vec![headline("Markets rally"), headline("Rust 2.0 ships")];
        self.answer("news top".into(), headlines).await
    }

    async fn by_topic(&self, topic: Topic) -> Result<Vec<Headline>, UpstreamError> {
        let headlines = vec![Headline {
            description: Some(String::new()),
            category: Some(topic.as_str().to_string()),
            ..headline("Topic story")
        }];
        self.answer(format!("news {}", topic.as_str()), headlines)
            .await
    }
}

#[async_trait]
impl ExchangeRateProvider for FakeUpstream {
    fn is_configured(&self) -> bool {
        true
    }

    async fn usd_rates(&self) -> Result<UsdRates, UpstreamError> {
        let rates = UsdRates {
            usd_eur: 0.9213,
            usd_inr: 83.1235,
        };
        self.answer("exchange usd".into(), rates).await
    }
}

// == Failing Cache Backend ==

/// A cache whose every operation fails, as if the server were down.
pub struct DownBackend;

fn down() -> CacheError {
    CacheError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl CacheBackend for DownBackend {
    fn name(&self) -> &'static str {
        "down"
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(down())
    }

    async fn get_ignoring_expiry(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(down())
    }

    async fn set_with_ttl(&self, _key: &str, _value: String, _ttl: u64) -> Result<(), CacheError> {
        Err(down())
    }

    async fn delete_by_prefix(&self, _prefix: &str) -> Result<usize, CacheError> {
        Err(down())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Err(down())
    }
}

/// A cache that accepts every call and never answers.
pub struct StalledBackend;

#[async_trait]
impl CacheBackend for StalledBackend {
    fn name(&self) -> &'static str {
        "stalled"
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        std::future::pending().await
    }

    async fn get_ignoring_expiry(&self, _key: &str) -> Result<Option<String>, CacheError> {
        std::future::pending().await
    }

    async fn set_with_ttl(&self, _key: &str, _value: String, _ttl: u64) -> Result<(), CacheError> {
        std::future::pending().await
    }

    async fn delete_by_prefix(&self, _prefix: &str) -> Result<usize, CacheError> {
        std::future::pending().await
    }

    async fn ping(&self) -> Result<(), CacheError> {
        std::future::pending().await
    }
}

// == App Helpers ==

pub const TEST_TIMEOUT: Duration = Duration::from_millis(500);

pub fn create_test_app(cache: CacheHandle, upstream: &Arc<FakeUpstream>) -> Router {
    create_router(AppState::new(cache, upstream.providers(), TEST_TIMEOUT))
}

pub async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
