use std::fmt::{self, Write};

use chrono::Local;
use weather_core::{FetchError, LookupState, WeatherReading};

pub fn reading(r: &WeatherReading) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_reading(&mut out, r);
    out
}

fn write_reading(out: &mut impl Write, r: &WeatherReading) -> fmt::Result {
    writeln!(out, "{}", r.place())?;
    writeln!(out, "  {}°C  {}", r.temperature_c, r.description)?;
    writeln!(out, "  Feels like   {}°C", r.feels_like_c)?;
    writeln!(out, "  Humidity     {}%", r.humidity_pct)?;
    writeln!(out, "  Wind speed   {} km/h", r.wind_speed_kmh)?;

    match r.visibility_display() {
        Some(km) => writeln!(out, "  Visibility   {km} km")?,
        None => writeln!(out, "  Visibility   n/a")?,
    }

    if let Some(url) = r.icon_url() {
        writeln!(out, "  Icon         {url}")?;
    }

    if let Some(at) = r.observed_at {
        writeln!(out, "  Observed     {}", at.with_timezone(&Local).format("%Y-%m-%d %H:%M"))?;
    }

    Ok(())
}

pub fn error(err: &FetchError) -> String {
    format!("✗ {}", err.message)
}

pub fn state(state: &LookupState) -> String {
    match state {
        LookupState::Idle => {
            "Enter a city name to get current weather conditions.\n\
             Note: New API keys may take up to 2 hours to activate."
                .to_string()
        }
        LookupState::Loading { query } => format!("Fetching weather for {query}..."),
        LookupState::Success(r) => reading(r),
        LookupState::Failure(err) => error(err),
    }
}
