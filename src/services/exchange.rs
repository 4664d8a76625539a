//! USD exchange rates.

use std::sync::Arc;

use crate::error::Result;
use crate::fetch::{keys, CacheAsideFetcher, FetchPolicy, Fetched, Source};
use crate::models::UsdRates;
use crate::upstream::ExchangeRateProvider;

const RATES: FetchPolicy<UsdRates> =
    FetchPolicy::new(Source::Exchange).with_validator(UsdRates::is_valid);

#[derive(Clone)]
pub struct ExchangeService {
    fetcher: CacheAsideFetcher,
    provider: Arc<dyn ExchangeRateProvider>,
}

impl ExchangeService {
    pub fn new(fetcher: CacheAsideFetcher, provider: Arc<dyn ExchangeRateProvider>) -> Self {
        Self { fetcher, provider }
    }

    pub async fn usd_rates(&self) -> Result<Fetched<UsdRates>> {
        self.fetcher
            .fetch(keys::EXCHANGE_USD, &RATES, || self.provider.usd_rates())
            .await
    }
}
