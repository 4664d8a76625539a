//! Current weather per city.

use std::sync::Arc;

use crate::cache::MAX_KEY_LENGTH;
use crate::error::{AppError, Result};
use crate::fetch::{keys, CacheAsideFetcher, FetchPolicy, Fetched, Source};
use crate::models::{title_case, Units, WeatherQuery, WeatherReport};
use crate::upstream::WeatherProvider;

const MAX_CITY_LENGTH: usize = 100;

/// Longest city, in UTF-8 bytes, whose `weather:<city>:imperial` key still fits the store.
const MAX_CITY_BYTES: usize = MAX_KEY_LENGTH - "weather:".len() - ":imperial".len();

const REPORT: FetchPolicy<WeatherReport> = FetchPolicy::new(Source::Weather);

#[derive(Clone)]
pub struct WeatherService {
    fetcher: CacheAsideFetcher,
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(fetcher: CacheAsideFetcher, provider: Arc<dyn WeatherProvider>) -> Self {
        Self { fetcher, provider }
    }

    /// Conditions for `city`. Units default to Celsius.
    pub async fn current(&self, query: &WeatherQuery) -> Result<Fetched<WeatherReport>> {
        let city = normalize_city(query.city.as_deref())?;
        let units = match query.unit.as_deref() {
            Some(raw) => Units::parse(raw)?,
            None => Units::Metric,
        };

        self.fetcher
            .fetch(&keys::weather(&city, units.as_str()), &REPORT, || {
                self.provider.current(&city, units)
            })
            .await
    }
}

/// Trims and title-cases a city name.
///
/// The limit applies to the title-cased form in bytes as well as chars, since
/// case mapping can grow a name and the store bounds keys by byte length.
pub fn normalize_city(raw: Option<&str>) -> Result<String> {
    let city = raw.map(str::trim).unwrap_or_default();
    if city.is_empty() {
        return Err(AppError::InvalidInput("Missing city parameter".to_string()));
    }
    if city.chars().count() > MAX_CITY_LENGTH || city.chars().any(char::is_control) {
        return Err(AppError::InvalidInput(format!("Invalid city: {city}")));
    }
    let city = title_case(city);
    if city.len() > MAX_CITY_BYTES {
        return Err(AppError::InvalidInput("Invalid city: name too long".to_string()));
    }
    Ok(city)
}
