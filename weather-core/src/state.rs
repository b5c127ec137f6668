//! Single-slot lookup state for interactive front-ends.
//!
//! A front-end holds one [`LookupSession`]. Each submission takes a ticket;
//! only the completion carrying the newest ticket is stored, so a slow
//! earlier request can never overwrite a later result.

use serde::Serialize;

use crate::{error::FetchError, model::WeatherReading};

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LookupState {
    #[default]
    Idle,
    Loading {
        query: String,
    },
    Success(WeatherReading),
    Failure(FetchError),
}

impl LookupState {
    pub fn reading(&self) -> Option<&WeatherReading> {
        match self {
            LookupState::Success(reading) => Some(reading),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            LookupState::Failure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<Result<WeatherReading, FetchError>> for LookupState {
    fn from(result: Result<WeatherReading, FetchError>) -> Self {
        match result {
            Ok(reading) => LookupState::Success(reading),
            Err(err) => LookupState::Failure(err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LookupTicket(u64);

#[derive(Debug, Default)]
pub struct LookupSession {
    state: LookupState,
    latest: u64,
}

impl LookupSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LookupState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LookupState::Loading { .. })
    }

    /// Start a lookup, superseding any still in flight.
    pub fn begin(&mut self, query: impl Into<String>) -> LookupTicket {
        self.latest += 1;
        self.state = LookupState::Loading { query: query.into() };
        LookupTicket(self.latest)
    }

    /// Store `result` if `ticket` is the newest one issued. Returns whether it was stored.
    pub fn complete(
        &mut self,
        ticket: LookupTicket,
        result: Result<WeatherReading, FetchError>,
    ) -> bool {
        if ticket.0 != self.latest {
            tracing::debug!(ticket = ticket.0, latest = self.latest, "dropping stale lookup result");
            return false;
        }

        self.state = result.into();
        true
    }

    /// Back to idle. Outstanding tickets become stale.
    pub fn reset(&mut self) {
        self.latest += 1;
        self.state = LookupState::Idle;
    }
}
