//! Crypto prices and market listing.

use std::sync::Arc;

use crate::error::Result;
use crate::fetch::{keys, CacheAsideFetcher, FetchPolicy, Fetched, Source};
use crate::models::{CoinMarket, CryptoPrices, MarketsQuery};
use crate::upstream::CryptoProvider;

const PRICES: FetchPolicy<CryptoPrices> =
    FetchPolicy::new(Source::Crypto).with_validator(CryptoPrices::is_valid);
const MARKETS: FetchPolicy<Vec<CoinMarket>> =
    FetchPolicy::new(Source::Crypto).with_validator(|markets| !markets.is_empty());

#[derive(Clone)]
pub struct CryptoService {
    fetcher: CacheAsideFetcher,
    provider: Arc<dyn CryptoProvider>,
}

impl CryptoService {
    pub fn new(fetcher: CacheAsideFetcher, provider: Arc<dyn CryptoProvider>) -> Self {
        Self { fetcher, provider }
    }

    /// BTC and ETH in USD.
    pub async fn prices(&self) -> Result<Fetched<CryptoPrices>> {
        self.fetcher
            .fetch(keys::CRYPTO_PRICES, &PRICES, || self.provider.spot_prices())
            .await
    }

    /// Top coins by market cap. The limit is validated before any cache access.
    pub async fn markets(&self, query: &MarketsQuery) -> Result<Fetched<Vec<CoinMarket>>> {
        let limit = query.limit()?;
        self.fetcher
            .fetch(&keys::crypto_markets(limit), &MARKETS, || {
                self.provider.markets(limit)
            })
            .await
    }
}
