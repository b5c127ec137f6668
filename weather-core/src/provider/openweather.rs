use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS},
    error::FetchError,
    model::{LocationQuery, WeatherReading, metres_to_km, mps_to_kmh, round_whole},
};

use super::WeatherProvider;

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoint: String,
    http: Client,
}

#[derive(Debug, Clone)]
pub struct OpenWeatherProviderBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl OpenWeatherProviderBuilder {
    /// Scheme and host of the provider, e.g. a mock server in tests.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<OpenWeatherProvider> {
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(OpenWeatherProvider {
            api_key: self.api_key,
            endpoint: endpoint_url(&self.base_url),
            http,
        })
    }
}

impl OpenWeatherProvider {
    pub fn builder(api_key: impl Into<String>) -> OpenWeatherProviderBuilder {
        OpenWeatherProviderBuilder {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherReading, FetchError> {
        debug!(city, endpoint = %self.endpoint, "requesting current weather");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(|err| {
                // The URL carries the API key.
                warn!(error = %err.without_url(), "OpenWeather request failed");
                FetchError::network()
            })?;

        let status = res.status();
        debug!(status = status.as_u16(), "OpenWeather responded");

        let body = res.text().await.map_err(|err| {
            warn!(error = %err.without_url(), "failed to read OpenWeather response body");
            FetchError::network()
        })?;

        if !status.is_success() {
            debug!(body = %truncate_body(&body), "OpenWeather error body");
            return Err(FetchError::from_status(status.as_u16()));
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(|err| {
            warn!(error = %err, body = %truncate_body(&body), "failed to parse OpenWeather JSON");
            FetchError::bad_payload(status.as_u16())
        })?;

        Ok(parsed.into_reading())
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    dt: Option<i64>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    sys: Option<OwSys>,
    /// Metres.
    visibility: Option<f64>,
}

impl OwCurrentResponse {
    fn into_reading(self) -> WeatherReading {
        let (description, icon) = self
            .weather
            .into_iter()
            .next()
            .map(|w| (w.description, w.icon))
            .unwrap_or_else(|| ("Unknown".to_string(), String::new()));

        WeatherReading {
            name: self.name,
            country: self.sys.and_then(|s| s.country).unwrap_or_default(),
            temperature_c: round_whole(self.main.temp),
            feels_like_c: round_whole(self.main.feels_like),
            humidity_pct: round_whole(self.main.humidity),
            description,
            icon,
            wind_speed_kmh: mps_to_kmh(self.wind.map(|w| w.speed).unwrap_or_default()),
            visibility_km: self.visibility.map(metres_to_km),
            observed_at: self.dt.and_then(|ts| DateTime::from_timestamp(ts, 0)),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, query: &LocationQuery) -> Result<WeatherReading, FetchError> {
        self.fetch_current(query.as_str()).await
    }
}

fn endpoint_url(base_url: &str) -> String {
    format!("{}{CURRENT_WEATHER_PATH}", base_url.trim_end_matches('/'))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
