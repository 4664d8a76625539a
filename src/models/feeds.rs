//! Normalized payloads produced by the upstream clients and cached as JSON.
//!
//! Field names match what the dashboard frontend already consumes.

use serde::{Deserialize, Serialize};

/// Spot prices in USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoPrices {
    #[serde(rename = "BTC")]
    pub btc: f64,
    #[serde(rename = "ETH")]
    pub eth: f64,
}

impl CryptoPrices {
    /// Both prices must be strictly positive.
    pub fn is_valid(&self) -> bool {
        self.btc > 0.0 && self.eth > 0.0
    }
}

/// One row of the market-cap-ordered coin listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinMarket {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub current_price: f64,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

/// Candle series for a symbol, column-oriented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockHistory {
    pub resolution: String,
    pub timestamps: Vec<i64>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
}

/// Current conditions for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub temp: i64,
    pub desc: String,
    pub icon: String,
    pub humidity: i64,
    pub wind_speed: f64,
    pub feels_like: i64,
    pub pressure: i64,
    /// Kilometres
    pub visibility: f64,
}

/// A news article summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub source: String,
    pub url: String,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// USD conversion rates, rounded to four decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsdRates {
    #[serde(rename = "USD_EUR")]
    pub usd_eur: f64,
    #[serde(rename = "USD_INR")]
    pub usd_inr: f64,
}

impl UsdRates {
    pub fn is_valid(&self) -> bool {
        self.usd_eur > 0.0 && self.usd_inr > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_prices_wire_names() {
        let prices = CryptoPrices {
            btc: 65_000.0,
            eth: 3_200.5,
        };
        let json = serde_json::to_value(&prices).unwrap();
        assert_eq!(json["BTC"], 65_000.0);
        assert_eq!(json["ETH"], 3_200.5);
    }

    #[test]
    fn test_crypto_prices_validation() {
        assert!(CryptoPrices { btc: 1.0, eth: 1.0 }.is_valid());
        assert!(!CryptoPrices { btc: 0.0, eth: 1.0 }.is_valid());
        assert!(!CryptoPrices { btc: 1.0, eth: -2.0 }.is_valid());
    }

    #[test]
    fn test_headline_omits_absent_extras() {
        let headline = Headline {
            title: "Rust 2.0 announced".into(),
            source: "Example Times".into(),
            url: "https://example.com/a".into(),
            published_at: "2024-05-01T10:00:00Z".into(),
            image: None,
            description: None,
            category: None,
        };
        let json = serde_json::to_value(&headline).unwrap();
        assert_eq!(json["publishedAt"], "2024-05-01T10:00:00Z");
        assert!(json.get("image").is_some());
        assert!(json.get("description").is_none());
        assert!(json.get("category").is_none());
    }

    #[test]
    fn test_usd_rates_wire_names_and_validation() {
        let rates: UsdRates = serde_json::from_str(r#"{"USD_EUR":0.9213,"USD_INR":83.1}"#).unwrap();
        assert!(rates.is_valid());
        assert!(!UsdRates { usd_eur: 0.0, usd_inr: 83.1 }.is_valid());
    }
}
