//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Redis connection URL; the in-memory store is used when unset
    pub redis_url: Option<String>,
    /// How long to wait for the initial Redis connection, in seconds
    pub redis_connect_timeout: u64,
    /// Upper bound on a single cache operation, in seconds
    pub cache_op_timeout: u64,
    /// Maximum number of entries the in-memory store can hold
    pub max_entries: usize,
    /// How long expired entries stay readable for stale fallback, in seconds
    pub stale_retention: u64,
    /// Background sweep interval in seconds
    pub cleanup_interval: u64,
    /// Upper bound on a single upstream call, in seconds
    pub upstream_timeout: u64,
    /// Provider credentials
    pub api_keys: ApiKeys,
}

/// Third-party API credentials. `None` means the provider is not configured.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    pub coingecko: Option<String>,
    pub finnhub: Option<String>,
    pub openweather: Option<String>,
    pub gnews: Option<String>,
    pub exchange_rate: Option<String>,
}

impl ApiKeys {
    /// Loads keys, accepting every alias the deployment env files have used.
    pub fn from_env() -> Self {
        Self {
            coingecko: first_var(&["CRYPTO_API_KEY", "COINGECKO_API_KEY"]),
            finnhub: first_var(&["STOCKS_API_KEY", "FINNHUB_API_KEY"]),
            openweather: first_var(&[
                "WEATHER_API_KEY",
                "OPENWEATHER_API_KEY",
                "VITE_OPENWEATHER_API_KEY",
            ]),
            gnews: first_var(&["NEWS_API_KEY", "GNEWS_API_KEY"]),
            exchange_rate: first_var(&["EXCHANGE_API_KEY"]),
        }
    }
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `REDIS_URL` - Redis URL (default: unset, in-memory store)
    /// - `REDIS_CONNECT_TIMEOUT_SECS` - Initial Redis connect timeout (default: 3)
    /// - `CACHE_OP_TIMEOUT_SECS` - Per-operation cache timeout (default: 2)
    /// - `MAX_ENTRIES` - In-memory store capacity (default: 10000)
    /// - `STALE_RETENTION_SECS` - Stale fallback window (default: 86400)
    /// - `CLEANUP_INTERVAL_SECS` - Sweep frequency (default: 60)
    /// - `UPSTREAM_TIMEOUT_SECS` - Upstream call timeout (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            redis_url: first_var(&["REDIS_URL"]),
            redis_connect_timeout: parse_var("REDIS_CONNECT_TIMEOUT_SECS")
                .unwrap_or(defaults.redis_connect_timeout),
            cache_op_timeout: parse_var("CACHE_OP_TIMEOUT_SECS")
                .unwrap_or(defaults.cache_op_timeout),
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            stale_retention: parse_var("STALE_RETENTION_SECS")
                .unwrap_or(defaults.stale_retention),
            cleanup_interval: parse_var("CLEANUP_INTERVAL_SECS")
                .unwrap_or(defaults.cleanup_interval),
            upstream_timeout: parse_var("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or(defaults.upstream_timeout),
            api_keys: ApiKeys::from_env(),
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }

    pub fn cache_op_timeout(&self) -> Duration {
        Duration::from_secs(self.cache_op_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8000,
            redis_url: None,
            redis_connect_timeout: 3,
            cache_op_timeout: 2,
            max_entries: 10_000,
            stale_retention: 86_400,
            cleanup_interval: 60,
            upstream_timeout: 10,
            api_keys: ApiKeys::default(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Returns the first alias that is set to a non-blank value.
fn first_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 8000);
        assert!(config.redis_url.is_none());
        assert_eq!(config.max_entries, 10_000);
        assert_eq!(config.stale_retention, 86_400);
        assert_eq!(config.cleanup_interval, 60);
        assert_eq!(config.upstream_timeout(), Duration::from_secs(10));
        assert_eq!(config.cache_op_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_first_var_skips_blank_aliases() {
        env::set_var("DATAPULSE_TEST_ALIAS_A", "  ");
        env::set_var("DATAPULSE_TEST_ALIAS_B", "key-b");
        let value = first_var(&[
            "DATAPULSE_TEST_ALIAS_MISSING",
            "DATAPULSE_TEST_ALIAS_A",
            "DATAPULSE_TEST_ALIAS_B",
        ]);
        assert_eq!(value.as_deref(), Some("key-b"));
    }

    #[test]
    fn test_parse_var_ignores_garbage() {
        env::set_var("DATAPULSE_TEST_PORT", "not-a-port");
        assert_eq!(parse_var::<u16>("DATAPULSE_TEST_PORT"), None);
        env::set_var("DATAPULSE_TEST_PORT", " 9000 ");
        assert_eq!(parse_var::<u16>("DATAPULSE_TEST_PORT"), Some(9000));
    }
}
