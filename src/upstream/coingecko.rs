//! CoinGecko client for spot prices and the market listing.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::info;

use super::http::get_json;
use super::CryptoProvider;
use crate::error::UpstreamError;
use crate::models::{CoinMarket, CryptoPrices};

const PROVIDER: &str = "CoinGecko";
const BASE_URL: &str = "https://api.coingecko.com/api/v3";

#[derive(Clone)]
pub struct CoinGeckoClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl CoinGeckoClient {
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

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(format!("{}{}", self.base_url, path));
        match &self.api_key {
            Some(key) => request.header("x-cg-demo-api-key", key),
            None => request,
        }
    }
}

/// `{"bitcoin": {"usd": 65000.0}, ...}`
type SimplePrice = HashMap<String, HashMap<String, f64>>;

/// Market row as CoinGecko sends it; delisted coins carry a null price.
#[derive(Deserialize)]
struct RawMarket {
    id: String,
    symbol: String,
    name: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    current_price: Option<f64>,
    #[serde(default)]
    market_cap: Option<f64>,
    #[serde(default)]
    market_cap_rank: Option<u32>,
    #[serde(default)]
    price_change_percentage_24h: Option<f64>,
}

impl RawMarket {
    fn into_market(self) -> Option<CoinMarket> {
        Some(CoinMarket {
            current_price: self.current_price?,
            id: self.id,
            symbol: self.symbol,
            name: self.name,
            image: self.image,
            market_cap: self.market_cap,
            market_cap_rank: self.market_cap_rank,
            price_change_percentage_24h: self.price_change_percentage_24h,
        })
    }
}

fn usd_price(prices: &SimplePrice, coin: &str) -> f64 {
    prices
        .get(coin)
        .and_then(|quote| quote.get("usd"))
        .copied()
        .unwrap_or(0.0)
}

#[async_trait]
impl CryptoProvider for CoinGeckoClient {
    /// The public tier needs no key.
    fn is_configured(&self) -> bool {
        true
    }

    async fn spot_prices(&self) -> Result<CryptoPrices, UpstreamError> {
        let request = self
            .get("/simple/price")
            .query(&[("ids", "bitcoin,ethereum"), ("vs_currencies", "usd")]);
        let body: SimplePrice = get_json(PROVIDER, request).await?;

        let prices = CryptoPrices {
            btc: usd_price(&body, "bitcoin"),
            eth: usd_price(&body, "ethereum"),
        };
        info!(
            "Fetched crypto prices: BTC=${:.2}, ETH=${:.2}",
            prices.btc, prices.eth
        );
        Ok(prices)
    }

    async fn markets(&self, limit: u16) -> Result<Vec<CoinMarket>, UpstreamError> {
        let per_page = limit.to_string();
        let request = self.get("/coins/markets").query(&[
            ("vs_currency", "usd"),
            ("order", "market_cap_desc"),
            ("per_page", per_page.as_str()),
            ("page", "1"),
        ]);
        let body: Vec<RawMarket> = get_json(PROVIDER, request).await?;

        Ok(body.into_iter().filter_map(RawMarket::into_market).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_coin_prices_as_zero() {
        let body: SimplePrice =
            serde_json::from_str(r#"{"bitcoin":{"usd":65000.5}}"#).unwrap();
        assert_eq!(usd_price(&body, "bitcoin"), 65_000.5);
        assert_eq!(usd_price(&body, "ethereum"), 0.0);
    }

    #[test]
    fn test_unpriced_market_rows_are_dropped() {
        let rows: Vec<RawMarket> = serde_json::from_str(
            r#"[
                {"id":"bitcoin","symbol":"btc","name":"Bitcoin","current_price":65000.0,"market_cap_rank":1},
                {"id":"ghost","symbol":"gst","name":"Ghost","current_price":null}
            ]"#,
        )
        .unwrap();

        let markets: Vec<CoinMarket> = rows.into_iter().filter_map(RawMarket::into_market).collect();
        assert_eq!(markets.len(), 1);
        assert_eq!(markets[0].market_cap_rank, Some(1));
    }
}
