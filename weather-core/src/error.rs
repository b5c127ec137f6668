//! Classified lookup failures.

use serde::Serialize;
use thiserror::Error;

pub const MSG_EMPTY_LOCATION: &str = "Please enter a location";
pub const MSG_NOT_FOUND: &str = "Location not found. Please check the city name and try again.";
pub const MSG_UNAUTHORIZED: &str = "API key error. The key may need activation (can take 2 hours) \
     or may be invalid. Please check at https://openweathermap.org/api";
pub const MSG_NETWORK: &str = "Network error. Please check your internet connection and try again.";
pub const MSG_BAD_PAYLOAD: &str =
    "Unexpected response from weather provider. Please try again later.";

/// Discrete failure category, usable for branching by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// Input rejected before any request was made.
    Validation,
    /// Provider answered 404.
    NotFound,
    /// Provider answered 401.
    Unauthorized,
    /// Any other non-2xx answer, or a 2xx we could not decode.
    ServerError,
    /// The request never produced a response (connect, DNS, timeout, body read).
    NetworkFailure,
}

impl FetchErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchErrorKind::Validation => "validation",
            FetchErrorKind::NotFound => "not_found",
            FetchErrorKind::Unauthorized => "unauthorized",
            FetchErrorKind::ServerError => "server_error",
            FetchErrorKind::NetworkFailure => "network_failure",
        }
    }
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
    /// HTTP status, when the provider answered at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl FetchError {
    pub fn new<S: Into<String>>(kind: FetchErrorKind, message: S) -> Self {
        Self { kind, message: message.into(), status: None }
    }

    pub fn empty_location() -> Self {
        Self::new(FetchErrorKind::Validation, MSG_EMPTY_LOCATION)
    }

    pub fn network() -> Self {
        Self::new(FetchErrorKind::NetworkFailure, MSG_NETWORK)
    }

    pub fn bad_payload(status: u16) -> Self {
        Self { status: Some(status), ..Self::new(FetchErrorKind::ServerError, MSG_BAD_PAYLOAD) }
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16) -> Self {
        let (kind, message) = match status {
            404 => (FetchErrorKind::NotFound, MSG_NOT_FOUND.to_string()),
            401 => (FetchErrorKind::Unauthorized, MSG_UNAUTHORIZED.to_string()),
            other => (
                FetchErrorKind::ServerError,
                format!("Error: {other}. Please try again later."),
            ),
        };

        Self { kind, message, status: Some(status) }
    }

    /// Whether asking the user to try again could plausibly help.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, FetchErrorKind::NetworkFailure | FetchErrorKind::ServerError)
    }
}
