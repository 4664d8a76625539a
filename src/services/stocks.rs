//! Stock quotes and candle history.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::fetch::{keys, CacheAsideFetcher, FetchPolicy, Fetched, Source};
use crate::models::{Period, StockHistory, StockHistoryResponse, StockPriceResponse};
use crate::upstream::StockProvider;

const MAX_SYMBOL_LENGTH: usize = 16;

const PRICE: FetchPolicy<f64> =
    FetchPolicy::new(Source::Stocks).with_validator(|price| price.is_finite() && *price > 0.0);
const HISTORY: FetchPolicy<StockHistory> =
    FetchPolicy::new(Source::Stocks).with_validator(|history| !history.close.is_empty());

#[derive(Clone)]
pub struct StocksService {
    fetcher: CacheAsideFetcher,
    provider: Arc<dyn StockProvider>,
}

impl StocksService {
    pub fn new(fetcher: CacheAsideFetcher, provider: Arc<dyn StockProvider>) -> Self {
        Self { fetcher, provider }
    }

    pub async fn price(&self, symbol: Option<&str>) -> Result<Fetched<StockPriceResponse>> {
        let symbol = normalize_symbol(symbol)?;
        let fetched = self
            .fetcher
            .fetch(&keys::stock_price(&symbol), &PRICE, || {
                self.provider.quote(&symbol)
            })
            .await?;

        Ok(fetched.map(|price| StockPriceResponse { symbol, price }))
    }

    /// Candle history; `period` defaults to one trading day.
    pub async fn history(
        &self,
        symbol: &str,
        period: Option<&str>,
    ) -> Result<Fetched<StockHistoryResponse>> {
        let symbol = normalize_symbol(Some(symbol))?;
        let period = match period {
            Some(raw) => Period::parse(raw)?,
            None => Period::OneDay,
        };

        let fetched = self
            .fetcher
            .fetch(&keys::stock_history(&symbol, period.label()), &HISTORY, || {
                self.provider.candles(&symbol, period)
            })
            .await?;

        Ok(fetched.map(|history| StockHistoryResponse {
            symbol,
            period: period.label().to_string(),
            history,
        }))
    }
}

/// Trims and upper-cases a ticker, rejecting anything that is not one.
pub fn normalize_symbol(raw: Option<&str>) -> Result<String> {
    let symbol = raw.map(str::trim).unwrap_or_default();
    if symbol.is_empty() {
        return Err(AppError::InvalidInput("Missing symbol parameter".to_string()));
    }

    let valid = symbol.len() <= MAX_SYMBOL_LENGTH
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if !valid {
        return Err(AppError::InvalidInput(format!("Invalid symbol: {symbol}")));
    }

    Ok(symbol.to_ascii_uppercase())
}
