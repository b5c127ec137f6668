use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// A trimmed, non-empty city name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationQuery(String);

impl LocationQuery {
    pub fn parse(input: &str) -> Result<Self, FetchError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(FetchError::empty_location());
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for LocationQuery {
    type Error = FetchError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// Normalized current conditions for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub name: String,
    pub country: String,
    pub temperature_c: i64,
    pub feels_like_c: i64,
    pub humidity_pct: i64,
    pub description: String,
    pub icon: String,
    pub wind_speed_kmh: i64,
    /// One decimal place. `None` when the provider omitted it.
    pub visibility_km: Option<f64>,
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherReading {
    pub fn icon_url(&self) -> Option<String> {
        if self.icon.is_empty() {
            None
        } else {
            Some(format!("{ICON_BASE_URL}/{}@2x.png", self.icon))
        }
    }

    pub fn visibility_display(&self) -> Option<String> {
        self.visibility_km.map(|km| format!("{km:.1}"))
    }

    /// "Paris, FR", or just the name when the country is unknown.
    pub fn place(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

/// Nearest whole unit, halves rounded towards positive infinity.
pub fn round_whole(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Nearest tenth of the exact binary value, as fixed-point display rounds it.
///
/// `4.35` is stored as `4.3499..` and so becomes `4.3`. An exact tie can only
/// happen on a quarter (`1.25`, `0.75`) and goes away from zero.
pub fn round_tenth(value: f64) -> f64 {
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        return (value * 10.0).round() / 10.0;
    }

    // Float formatting rounds the exact decimal expansion.
    format!("{value:.1}").parse().unwrap_or(value)
}

pub fn mps_to_kmh(speed_mps: f64) -> i64 {
    round_whole(speed_mps * 3.6)
}

pub fn metres_to_km(metres: f64) -> f64 {
    round_tenth(metres / 1000.0)
}
