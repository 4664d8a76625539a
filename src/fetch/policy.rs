//! Per-source cache policy: key namespaces, TTLs and validation.
//!
//! Key shapes and TTLs are shared with existing deployments and must not change.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::AppError;

// == Data Source ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Crypto,
    Stocks,
    Weather,
    News,
    Exchange,
}

impl Source {
    pub const ALL: [Source; 5] = [
        Source::Crypto,
        Source::Stocks,
        Source::Weather,
        Source::News,
        Source::Exchange,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Source::Crypto => "crypto",
            Source::Stocks => "stocks",
            Source::Weather => "weather",
            Source::News => "news",
            Source::Exchange => "exchange",
        }
    }

    /// Freshness window in seconds.
    pub const fn ttl(&self) -> u64 {
        match self {
            Source::Crypto => 60,
            Source::Stocks => 60,
            Source::Weather => 300,
            Source::News => 900,
            Source::Exchange => 21_600,
        }
    }

    /// Every key prefix the source writes under.
    pub fn key_prefixes(&self) -> &'static [&'static str] {
        match self {
            Source::Crypto => &[keys::CRYPTO_PRICES],
            Source::Stocks => &["stock_price:", "stock_history:"],
            Source::Weather => &["weather:"],
            Source::News => &["news:"],
            Source::Exchange => &["exchange:"],
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Source {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|source| source.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::NotFound(format!("Unknown data source: {s}")))
    }
}

// == Fetch Policy ==
/// TTL plus the rule deciding whether an upstream payload is usable.
pub struct FetchPolicy<T> {
    pub ttl: u64,
    pub validate: fn(&T) -> bool,
}

impl<T> FetchPolicy<T> {
    /// Accepts any payload the provider managed to decode.
    pub const fn new(source: Source) -> Self {
        Self {
            ttl: source.ttl(),
            validate: accept_any,
        }
    }

    pub const fn with_validator(self, validate: fn(&T) -> bool) -> Self {
        Self {
            ttl: self.ttl,
            validate,
        }
    }

    pub fn is_valid(&self, data: &T) -> bool {
        (self.validate)(data)
    }
}

fn accept_any<T>(_: &T) -> bool {
    true
}

// == Cache Keys ==
/// Builders for the `"<source>:<params>"` key namespace.
pub mod keys {
    pub const CRYPTO_PRICES: &str = "crypto_prices";
    pub const NEWS_TOP: &str = "news:top_headlines";
    pub const EXCHANGE_USD: &str = "exchange:usd_rates";

    pub fn crypto_markets(limit: u16) -> String {
        format!("{CRYPTO_PRICES}:{limit}")
    }

    pub fn stock_price(symbol: &str) -> String {
        format!("stock_price:{symbol}")
    }

    pub fn stock_history(symbol: &str, period: &str) -> String {
        format!("stock_history:{symbol}:{period}")
    }

    pub fn weather(city: &str, units: &str) -> String {
        format!("weather:{city}:{units}")
    }

    pub fn news_category(category: &str) -> String {
        format!("news:category:{category}")
    }
}
