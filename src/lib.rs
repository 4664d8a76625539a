//! DataPulse - a caching aggregation API for dashboard data feeds
//!
//! Fronts crypto, stock, weather, news and exchange-rate providers with a
//! cache-aside layer that serves stale data when a provider is down.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod services;
pub mod tasks;
pub mod upstream;

pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
