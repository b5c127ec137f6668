use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Config,
    error::FetchError,
    model::{LocationQuery, WeatherReading},
    provider::openweather::OpenWeatherProvider,
};

pub mod openweather;

/// A source of current conditions for a validated location.
///
/// Implementations make at most one outbound request per call and never retry.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, query: &LocationQuery) -> Result<WeatherReading, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    let provider = OpenWeatherProvider::builder(api_key)
        .base_url(config.base_url())
        .timeout(config.timeout())
        .build()?;

    Ok(Box::new(provider))
}
