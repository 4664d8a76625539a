//! Finnhub client for quotes and candles.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::http::{get_json, not_found_as, require_key};
use super::StockProvider;
use crate::error::UpstreamError;
use crate::models::{Period, StockHistory};

const PROVIDER: &str = "Finnhub";
const BASE_URL: &str = "https://finnhub.io/api/v1";

#[derive(Clone)]
pub struct FinnhubClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl FinnhubClient {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Quote body. Unknown symbols come back as all zeros with null deltas,
/// or with an `error` field.
#[derive(Deserialize)]
struct Quote {
    #[serde(default)]
    c: Value,
    #[serde(default)]
    d: Value,
    #[serde(default)]
    error: Option<String>,
}

impl Quote {
    fn into_price(self, symbol: &str) -> Result<f64, UpstreamError> {
        if let Some(error) = self.error {
            tracing::error!("Finnhub error for {}: {}", symbol, error);
            return Err(UpstreamError::NotFound(format!("Invalid symbol: {symbol}")));
        }

        let price = self.c.as_f64().ok_or_else(|| {
            UpstreamError::InvalidResponse("quote is missing a numeric price".to_string())
        })?;

        if price == 0.0 && self.d.is_null() {
            return Err(UpstreamError::NotFound(format!("Symbol not found: {symbol}")));
        }
        Ok(price)
    }
}

#[derive(Deserialize)]
struct Candles {
    s: String,
    #[serde(default)]
    t: Vec<i64>,
    #[serde(default)]
    o: Vec<f64>,
    #[serde(default)]
    h: Vec<f64>,
    #[serde(default)]
    l: Vec<f64>,
    #[serde(default)]
    c: Vec<f64>,
    #[serde(default)]
    v: Vec<f64>,
}

#[async_trait]
impl StockProvider for FinnhubClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn quote(&self, symbol: &str) -> Result<f64, UpstreamError> {
        let token = require_key(PROVIDER, &self.api_key)?;
        let request = self
            .client
            .get(format!("{}/quote", self.base_url))
            .query(&[("symbol", symbol), ("token", token)]);

        let quote: Quote = get_json(PROVIDER, request)
            .await
            .map_err(|err| not_found_as(err, || format!("Symbol not found: {symbol}")))?;
        quote.into_price(symbol)
    }

    async fn candles(&self, symbol: &str, period: Period) -> Result<StockHistory, UpstreamError> {
        let token = require_key(PROVIDER, &self.api_key)?;
        let to = chrono::Utc::now();
        let from = to - period.span();
        let (from, to) = (from.timestamp().to_string(), to.timestamp().to_string());

        let request = self
            .client
            .get(format!("{}/stock/candle", self.base_url))
            .query(&[
                ("symbol", symbol),
                ("resolution", period.resolution()),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("token", token),
            ]);

        let candles: Candles = get_json(PROVIDER, request)
            .await
            .map_err(|err| not_found_as(err, || format!("Symbol not found: {symbol}")))?;

        if candles.s != "ok" {
            return Err(UpstreamError::NotFound(format!(
                "No {} history for {}",
                period.label(),
                symbol
            )));
        }

        Ok(StockHistory {
            resolution: period.resolution().to_string(),
            timestamps: candles.t,
            open: candles.o,
            high: candles.h,
            low: candles.l,
            close: candles.c,
            volume: candles.v,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(body: &str) -> Quote {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_quote_price() {
        let price = quote(r#"{"c":189.84,"d":1.2,"dp":0.6}"#).into_price("AAPL");
        assert_eq!(price.unwrap(), 189.84);
    }

    #[test]
    fn test_quote_error_field_is_not_found() {
        let err = quote(r#"{"error":"Symbol not supported"}"#)
            .into_price("ZZZZ")
            .unwrap_err();
        assert!(matches!(err, UpstreamError::NotFound(msg) if msg == "Invalid symbol: ZZZZ"));
    }

    #[test]
    fn test_quote_zero_without_delta_is_not_found() {
        let err = quote(r#"{"c":0,"d":null,"dp":null}"#).into_price("NOPE").unwrap_err();
        assert!(matches!(err, UpstreamError::NotFound(_)));
    }

    #[test]
    fn test_quote_non_numeric_price_is_invalid() {
        let err = quote(r#"{"c":"n/a"}"#).into_price("AAPL").unwrap_err();
        assert!(matches!(err, UpstreamError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_missing_key_skips_network() {
        let client = FinnhubClient::new(Client::new(), None).with_base_url("http://127.0.0.1:9");
        let err = client.quote("AAPL").await.unwrap_err();
        assert!(matches!(err, UpstreamError::MissingCredentials("Finnhub")));
    }
}
