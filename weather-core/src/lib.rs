//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The current-conditions lookup contract ([`WeatherClient`])
//! - Classified lookup errors and the normalized reading model
//! - Single-slot lookup state for interactive front-ends
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod state;

pub use client::WeatherClient;
pub use config::Config;
pub use error::{FetchError, FetchErrorKind};
pub use model::{LocationQuery, WeatherReading};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use state::{LookupSession, LookupState, LookupTicket};
