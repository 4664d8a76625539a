//! Query-string DTOs for the DataPulse API
//!
//! Every field is optional at the extractor level so that a missing or
//! malformed parameter surfaces as a JSON `InvalidInput` error from the
//! service layer rather than as a bare extractor rejection.

use serde::Deserialize;

use crate::error::{AppError, Result};

/// Default number of coins in the market listing
pub const DEFAULT_MARKET_LIMIT: u16 = 50;
/// CoinGecko's page-size ceiling
pub const MAX_MARKET_LIMIT: u16 = 250;

/// `GET /api/crypto/markets?limit=N`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketsQuery {
    #[serde(default)]
    pub limit: Option<String>,
}

impl MarketsQuery {
    /// Parses and bounds-checks the limit.
    pub fn limit(&self) -> Result<u16> {
        let Some(raw) = self.limit.as_deref() else {
            return Ok(DEFAULT_MARKET_LIMIT);
        };

        match raw.trim().parse::<u16>() {
            Ok(limit) if (1..=MAX_MARKET_LIMIT).contains(&limit) => Ok(limit),
            _ => Err(AppError::InvalidInput(format!(
                "limit must be between 1 and {}",
                MAX_MARKET_LIMIT
            ))),
        }
    }
}

/// `GET /api/stocks?symbol=AAPL`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockQuery {
    #[serde(default)]
    pub symbol: Option<String>,
}

/// `GET /api/stocks/historical/:symbol?period=1D`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub period: Option<String>,
}

/// `GET /api/weather?city=Paris&unit=C`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherQuery {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

/// `GET /api/news?category=technology`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsQuery {
    #[serde(default)]
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markets(limit: Option<&str>) -> MarketsQuery {
        MarketsQuery {
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn test_markets_limit_default() {
        assert_eq!(markets(None).limit().unwrap(), DEFAULT_MARKET_LIMIT);
    }

    #[test]
    fn test_markets_limit_bounds() {
        assert_eq!(markets(Some("1")).limit().unwrap(), 1);
        assert_eq!(markets(Some(" 250 ")).limit().unwrap(), 250);
        assert!(markets(Some("0")).limit().is_err());
        assert!(markets(Some("251")).limit().is_err());
        assert!(markets(Some("ten")).limit().is_err());
    }

    #[test]
    fn test_weather_query_deserialize() {
        let query: WeatherQuery = serde_json::from_str(r#"{"city":"Paris"}"#).unwrap();
        assert_eq!(query.city.as_deref(), Some("Paris"));
        assert!(query.unit.is_none());
    }
}
