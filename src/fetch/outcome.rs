//! Fetch outcome types.

use serde::Serialize;

/// Where the data returned by a fetch came from.
///
/// The fourth outcome, "unavailable", is not a variant: it is the
/// [`AppError::NoDataAvailable`](crate::error::AppError::NoDataAvailable) error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchOutcome {
    /// Served from a non-expired cache entry
    Fresh,
    /// Fetched from upstream and written to the cache
    Refreshed,
    /// Upstream failed; served from an expired but retained entry
    Stale,
}

impl FetchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchOutcome::Fresh => "fresh",
            FetchOutcome::Refreshed => "refreshed",
            FetchOutcome::Stale => "stale",
        }
    }
}

/// Data plus the outcome that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub outcome: FetchOutcome,
}

impl<T> Fetched<T> {
    pub fn new(data: T, outcome: FetchOutcome) -> Self {
        Self { data, outcome }
    }

    /// Transforms the payload, keeping the outcome.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            data: f(self.data),
            outcome: self.outcome,
        }
    }
}
