//! The lookup contract used by front-ends: validate, fetch once, classify.

use tracing::{info, warn};

use crate::{
    Config,
    error::FetchError,
    model::{LocationQuery, WeatherReading},
    provider::{WeatherProvider, provider_from_config},
};

#[derive(Debug)]
pub struct WeatherClient {
    provider: Box<dyn WeatherProvider>,
}

impl WeatherClient {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Build a client backed by OpenWeather, using the configured key and endpoint.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(provider_from_config(config)?))
    }

    /// Look up current conditions for free-text `input`.
    ///
    /// Blank input is rejected with [`FetchErrorKind::Validation`](crate::FetchErrorKind)
    /// before the provider is touched. Otherwise exactly one request is made.
    pub async fn fetch_weather(&self, input: &str) -> Result<WeatherReading, FetchError> {
        let query = LocationQuery::parse(input)?;
        self.fetch_location(&query).await
    }

    pub async fn fetch_location(&self, query: &LocationQuery) -> Result<WeatherReading, FetchError> {
        let result = self.provider.current_weather(query).await;

        match &result {
            Ok(reading) => info!(
                query = %query,
                place = %reading.place(),
                temperature_c = reading.temperature_c,
                "weather lookup succeeded"
            ),
            Err(err) => warn!(query = %query, kind = %err.kind, status = ?err.status, "weather lookup failed"),
        }

        result
    }
}
