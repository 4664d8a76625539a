//! Third-party data providers
//!
//! One trait per data family so the services can be driven by fakes in tests.
//! Each concrete client owns a clone of the shared [`reqwest::Client`] and a
//! base URL that tests point at a local mock server.

mod coingecko;
mod exchange_rate;
mod finnhub;
mod gnews;
pub mod http;
mod openweather;

pub use coingecko::CoinGeckoClient;
pub use exchange_rate::ExchangeRateClient;
pub use finnhub::FinnhubClient;
pub use gnews::GNewsClient;
pub use openweather::OpenWeatherClient;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ApiKeys;
use crate::error::UpstreamError;
use crate::models::{
    CoinMarket, CryptoPrices, Headline, Period, StockHistory, Topic, Units, UsdRates,
    WeatherReport,
};

// == Provider Traits ==
#[async_trait]
pub trait CryptoProvider: Send + Sync {
    fn is_configured(&self) -> bool;

    /// BTC and ETH spot prices in USD.
    async fn spot_prices(&self) -> Result<CryptoPrices, UpstreamError>;

    /// Top `limit` coins ordered by market cap.
    async fn markets(&self, limit: u16) -> Result<Vec<CoinMarket>, UpstreamError>;
}

#[async_trait]
pub trait StockProvider: Send + Sync {
    fn is_configured(&self) -> bool;

    /// Latest traded price for an already-normalized symbol.
    async fn quote(&self, symbol: &str) -> Result<f64, UpstreamError>;

    async fn candles(&self, symbol: &str, period: Period) -> Result<StockHistory, UpstreamError>;
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    fn is_configured(&self) -> bool;

    async fn current(&self, city: &str, units: Units) -> Result<WeatherReport, UpstreamError>;
}

#[async_trait]
pub trait NewsProvider: Send + Sync {
    fn is_configured(&self) -> bool;

    async fn top_headlines(&self) -> Result<Vec<Headline>, UpstreamError>;

    async fn by_topic(&self, topic: Topic) -> Result<Vec<Headline>, UpstreamError>;
}

#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    fn is_configured(&self) -> bool;

    async fn usd_rates(&self) -> Result<UsdRates, UpstreamError>;
}

// == Provider Set ==
/// Every provider the services need, behind trait objects.
#[derive(Clone)]
pub struct Providers {
    pub crypto: Arc<dyn CryptoProvider>,
    pub stocks: Arc<dyn StockProvider>,
    pub weather: Arc<dyn WeatherProvider>,
    pub news: Arc<dyn NewsProvider>,
    pub exchange: Arc<dyn ExchangeRateProvider>,
}

impl Providers {
    /// Builds the real HTTP clients, all sharing `client`.
    pub fn from_keys(client: reqwest::Client, keys: &ApiKeys) -> Self {
        Self {
            crypto: Arc::new(CoinGeckoClient::new(client.clone(), keys.coingecko.clone())),
            stocks: Arc::new(FinnhubClient::new(client.clone(), keys.finnhub.clone())),
            weather: Arc::new(OpenWeatherClient::new(
                client.clone(),
                keys.openweather.clone(),
            )),
            news: Arc::new(GNewsClient::new(client.clone(), keys.gnews.clone())),
            exchange: Arc::new(ExchangeRateClient::new(client, keys.exchange_rate.clone())),
        }
    }

    /// Which providers have credentials, keyed by data source name.
    pub fn configured(&self) -> BTreeMap<&'static str, bool> {
        BTreeMap::from([
            ("crypto", self.crypto.is_configured()),
            ("stocks", self.stocks.is_configured()),
            ("weather", self.weather.is_configured()),
            ("news", self.news.is_configured()),
            ("exchange", self.exchange.is_configured()),
        ])
    }
}
