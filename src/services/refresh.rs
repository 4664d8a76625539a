//! Manual cache invalidation followed by a re-fetch of each source's default query.

use std::collections::BTreeMap;

use tracing::{info, warn};

use super::{CryptoService, ExchangeService, NewsService, StocksService, WeatherService};
use crate::error::Result;
use crate::fetch::{CacheAsideFetcher, Source};
use crate::models::WeatherQuery;

const DEFAULT_SYMBOL: &str = "AAPL";
const DEFAULT_CITY: &str = "New York";

#[derive(Clone)]
pub struct RefreshService {
    pub(crate) fetcher: CacheAsideFetcher,
    pub(crate) crypto: CryptoService,
    pub(crate) stocks: StocksService,
    pub(crate) weather: WeatherService,
    pub(crate) news: NewsService,
    pub(crate) exchange: ExchangeService,
}

impl RefreshService {
    /// Refreshes every source. One failing source never stops the others.
    pub async fn refresh_all(&self) -> BTreeMap<String, String> {
        let mut results = BTreeMap::new();
        for source in Source::ALL {
            results.insert(source.name().to_string(), self.report(source).await);
        }
        results
    }

    /// Refreshes one source by name; an unknown name is `NotFound`.
    pub async fn refresh_one(&self, name: &str) -> Result<BTreeMap<String, String>> {
        let source: Source = name.parse()?;
        let mut results = BTreeMap::new();
        results.insert(source.name().to_string(), self.report(source).await);
        Ok(results)
    }

    async fn report(&self, source: Source) -> String {
        match self.refresh(source).await {
            Ok(()) => {
                info!("Refreshed {}", source);
                "success".to_string()
            }
            Err(err) => {
                warn!("Refresh of {} failed: {}", source, err);
                format!("error: {err}")
            }
        }
    }

    async fn refresh(&self, source: Source) -> Result<()> {
        self.fetcher.invalidate(source.key_prefixes()).await;

        match source {
            Source::Crypto => self.crypto.prices().await.map(drop),
            Source::Stocks => self.stocks.price(Some(DEFAULT_SYMBOL)).await.map(drop),
            Source::Weather => {
                let query = WeatherQuery {
                    city: Some(DEFAULT_CITY.to_string()),
                    unit: None,
                };
                self.weather.current(&query).await.map(drop)
            }
            Source::News => self.news.top_headlines().await.map(drop),
            Source::Exchange => self.exchange.usd_rates().await.map(drop),
        }
    }
}
