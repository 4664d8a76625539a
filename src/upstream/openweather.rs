//! OpenWeather current-conditions client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::http::{get_json, not_found_as, require_key};
use super::WeatherProvider;
use crate::error::UpstreamError;
use crate::models::{title_case, Units, WeatherReport};

const PROVIDER: &str = "OpenWeather";
const BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
/// Reported when the station omits visibility, in metres.
const DEFAULT_VISIBILITY_M: f64 = 10_000.0;

#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenWeatherClient {
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

#[derive(Debug, Deserialize)]
struct Current {
    name: String,
    main: Main,
    weather: Vec<Condition>,
    wind: Wind,
    #[serde(default)]
    visibility: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp: f64,
    feels_like: f64,
    humidity: i64,
    pressure: i64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

impl Current {
    fn into_report(self) -> Result<WeatherReport, UpstreamError> {
        let condition = self.weather.into_iter().next().ok_or_else(|| {
            UpstreamError::InvalidResponse("weather conditions missing".to_string())
        })?;

        Ok(WeatherReport {
            city: self.name,
            temp: self.main.temp.round() as i64,
            desc: title_case(&condition.description),
            icon: condition.icon,
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            feels_like: self.main.feels_like.round() as i64,
            pressure: self.main.pressure,
            visibility: self.visibility.unwrap_or(DEFAULT_VISIBILITY_M) / 1000.0,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn current(&self, city: &str, units: Units) -> Result<WeatherReport, UpstreamError> {
        let appid = require_key(PROVIDER, &self.api_key)?;
        let request = self.client.get(&self.base_url).query(&[
            ("q", city),
            ("appid", appid),
            ("units", units.as_str()),
        ]);

        let current: Current = get_json(PROVIDER, request)
            .await
            .map_err(|err| not_found_as(err, || format!("City not found: {city}")))?;
        debug!("OpenWeather response for {} ({}): {:?}", city, units.as_str(), current);

        current.into_report()
    }
}
