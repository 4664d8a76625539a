//! Error types for the DataPulse server
//!
//! Provides unified error handling using thiserror. Three layers:
//! - [`CacheError`]: anything the cache store reports. Always absorbed by the fetcher.
//! - [`UpstreamError`]: anything a third-party provider reports. Absorbed until
//!   the stale fallback is exhausted.
//! - [`AppError`]: what actually reaches a caller, mapped to an HTTP status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised by a cache backend.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key has expired
    #[error("Key expired: {0}")]
    Expired(String),

    /// Invalid request data (key too long, value too large)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Cache is full and eviction failed
    #[error("Cache full: {0}")]
    CacheFull(String),

    /// Backend could not be reached or returned an error
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Unavailable(err.to_string())
    }
}

// == Upstream Error Enum ==
/// Errors raised while calling a third-party data provider.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// No API key configured for the provider
    #[error("{0} API key not configured")]
    MissingCredentials(&'static str),

    /// Provider rejected the configured key
    #[error("{0} rejected the configured API key")]
    Unauthorized(&'static str),

    /// Provider throttled the request
    #[error("{0} API rate limit exceeded")]
    RateLimited(&'static str),

    /// Provider does not know the requested symbol/city
    #[error("{0}")]
    NotFound(String),

    /// Provider answered with an unexpected status code
    #[error("{provider} returned HTTP {status}")]
    Status { provider: &'static str, status: u16 },

    /// Request did not complete within the upstream timeout
    #[error("Upstream request timed out")]
    Timeout,

    /// Transport-level failure
    #[error("Upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Payload was malformed or semantically invalid (e.g. a zero price)
    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),
}

impl UpstreamError {
    /// Classifies a transport error, keeping timeouts distinct.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_decode() {
            UpstreamError::InvalidResponse(err.to_string())
        } else {
            UpstreamError::Request(err)
        }
    }

    /// HTTP status the API layer reports when this error exhausts every fallback.
    pub fn status_code(&self) -> StatusCode {
        match self {
            UpstreamError::NotFound(_) => StatusCode::NOT_FOUND,
            UpstreamError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            UpstreamError::MissingCredentials(_) | UpstreamError::Unauthorized(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            UpstreamError::Status { .. }
            | UpstreamError::Timeout
            | UpstreamError::Request(_)
            | UpstreamError::InvalidResponse(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

// == App Error Enum ==
/// Errors surfaced to callers of the data services.
#[derive(Error, Debug)]
pub enum AppError {
    /// Caller-supplied parameter is malformed; raised before any cache or upstream activity
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Neither fresh cache, upstream, nor stale cache could answer
    #[error("No data available for '{key}': {cause}")]
    NoDataAvailable { key: String, cause: UpstreamError },

    /// Requested resource does not exist (unknown data source, no stats)
    #[error("Not found: {0}")]
    NotFound(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NoDataAvailable { cause, .. } => cause.status_code(),
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the service and API layers.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn no_data(cause: UpstreamError) -> AppError {
        AppError::NoDataAvailable {
            key: "stock_price:AAPL".to_string(),
            cause,
        }
    }

    #[test]
    fn test_invalid_input_maps_to_400() {
        let response = AppError::InvalidInput("Missing symbol parameter".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_no_data_status_follows_cause() {
        let cases = [
            (UpstreamError::Timeout, StatusCode::SERVICE_UNAVAILABLE),
            (UpstreamError::RateLimited("Finnhub"), StatusCode::TOO_MANY_REQUESTS),
            (
                UpstreamError::MissingCredentials("Finnhub"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                UpstreamError::NotFound("City not found: Atlantis".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                UpstreamError::InvalidResponse("zero price".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                UpstreamError::Status {
                    provider: "GNews",
                    status: 502,
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (cause, expected) in cases {
            assert_eq!(no_data(cause).into_response().status(), expected);
        }
    }

    #[test]
    fn test_no_data_message_names_key() {
        let err = no_data(UpstreamError::Timeout);
        assert!(err.to_string().contains("stock_price:AAPL"));
        assert!(err.to_string().contains("timed out"));
    }
}
