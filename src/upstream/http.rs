//! Shared request plumbing for the provider clients.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::UpstreamError;

/// Builds the one HTTP client every provider shares.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("datapulse/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Sends `request` and decodes a JSON body, classifying failures.
///
/// 401 is a bad key, 403 and 429 are throttling, anything else non-2xx is a
/// plain status error. Providers remap 404 themselves.
pub async fn get_json<T: DeserializeOwned>(
    provider: &'static str,
    request: RequestBuilder,
) -> Result<T, UpstreamError> {
    let response = request.send().await.map_err(UpstreamError::from_transport)?;
    check_status(provider, response.status())?;
    response.json::<T>().await.map_err(UpstreamError::from_transport)
}

pub fn check_status(provider: &'static str, status: StatusCode) -> Result<(), UpstreamError> {
    if status.is_success() {
        return Ok(());
    }

    Err(match status {
        StatusCode::UNAUTHORIZED => UpstreamError::Unauthorized(provider),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
            UpstreamError::RateLimited(provider)
        }
        other => UpstreamError::Status {
            provider,
            status: other.as_u16(),
        },
    })
}

/// Turns a 404 status error into a caller-facing "not found".
pub fn not_found_as(err: UpstreamError, message: impl FnOnce() -> String) -> UpstreamError {
    match err {
        UpstreamError::Status { status: 404, .. } => UpstreamError::NotFound(message()),
        other => other,
    }
}

/// Returns the key or a `MissingCredentials` error naming the provider.
pub fn require_key<'a>(
    provider: &'static str,
    key: &'a Option<String>,
) -> Result<&'a str, UpstreamError> {
    key.as_deref().ok_or(UpstreamError::MissingCredentials(provider))
}

pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
