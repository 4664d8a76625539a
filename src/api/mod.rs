//! API Module
//!
//! HTTP handlers and routing for the DataPulse REST API.
//!
//! # Endpoints
//! - `GET /` - Service banner
//! - `GET /api/health` - Cache and provider health
//! - `GET /api/cache/stats` - Cache counters
//! - `GET /api/crypto`, `GET /api/crypto/markets` - Crypto prices and listing
//! - `GET /api/stocks`, `GET /api/stocks/historical/:symbol` - Quotes and candles
//! - `GET /api/weather` - Current weather
//! - `GET /api/news` - Headlines
//! - `GET /api/exchange-rate` - USD rates
//! - `POST /api/refresh`, `POST /api/refresh/:source` - Invalidate and re-fetch

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
