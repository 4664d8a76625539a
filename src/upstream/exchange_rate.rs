//! ExchangeRate-API client for USD conversion rates.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::http::{get_json, require_key, round4};
use super::ExchangeRateProvider;
use crate::error::UpstreamError;
use crate::models::UsdRates;

const PROVIDER: &str = "ExchangeRate-API";
const BASE_URL: &str = "https://v6.exchangerate-api.com/v6";

#[derive(Clone)]
pub struct ExchangeRateClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl ExchangeRateClient {
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

#[derive(Deserialize)]
struct Latest {
    #[serde(default)]
    result: Option<String>,
    #[serde(default, rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    conversion_rates: HashMap<String, f64>,
}

impl Latest {
    fn into_rates(self) -> Result<UsdRates, UpstreamError> {
        if self.result.as_deref() == Some("error") {
            return Err(match self.error_type.as_deref() {
                Some("invalid-key") | Some("inactive-account") => {
                    UpstreamError::Unauthorized(PROVIDER)
                }
                Some("quota-reached") => UpstreamError::RateLimited(PROVIDER),
                other => UpstreamError::InvalidResponse(
                    other.unwrap_or("unknown error").to_string(),
                ),
            });
        }

        let rate = |currency: &str| {
            round4(self.conversion_rates.get(currency).copied().unwrap_or(0.0))
        };
        Ok(UsdRates {
            usd_eur: rate("EUR"),
            usd_inr: rate("INR"),
        })
    }
}

#[async_trait]
impl ExchangeRateProvider for ExchangeRateClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn usd_rates(&self) -> Result<UsdRates, UpstreamError> {
        let key = require_key(PROVIDER, &self.api_key)?;
        let request = self
            .client
            .get(format!("{}/{}/latest/USD", self.base_url, key));

        let latest: Latest = get_json(PROVIDER, request).await?;
        latest.into_rates()
    }
}
