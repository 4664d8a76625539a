//! Request, response and feed models for the DataPulse API
//!
//! This module defines the DTOs used for serializing/deserializing HTTP
//! request and response bodies, and the normalized payloads each upstream
//! client produces.

pub mod feeds;
pub mod params;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use feeds::{CoinMarket, CryptoPrices, Headline, StockHistory, UsdRates, WeatherReport};
pub use params::{title_case, Period, Topic, Units};
pub use requests::{HistoryQuery, MarketsQuery, NewsQuery, StockQuery, WeatherQuery};
pub use responses::{
    HealthResponse, RefreshResponse, RootResponse, StatsResponse, StockHistoryResponse,
    StockPriceResponse,
};
