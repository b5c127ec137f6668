use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use tracing::debug;
use weather_core::{Config, LookupSession, WeatherClient};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather conditions by city")]
pub struct Cli {
    /// OpenWeather API key for this invocation; overrides config and OPENWEATHER_API_KEY.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Defaults to `interactive` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, e.g. `London` or `New York`.
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,

        /// Print the reading (or error) as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Prompt for cities until cancelled (Esc or Ctrl-C).
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Some(Command::Configure) => configure(),
            Some(Command::Show { city, json }) => {
                let client = build_client(self.api_key)?;
                show(&client, &city.join(" "), json).await
            }
            Some(Command::Interactive) | None => {
                let client = build_client(self.api_key)?;
                interactive(&client).await
            }
        }
    }
}

fn build_client(api_key: Option<String>) -> anyhow::Result<WeatherClient> {
    let mut config = Config::load()?;
    if let Some(key) = api_key {
        config.set_api_key(key);
    }

    WeatherClient::from_config(&config)
}

fn configure() -> anyhow::Result<ExitCode> {
    let mut config = Config::load_file()?;

    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get one at https://openweathermap.org/api")
        .prompt()
        .context("Failed to read API key")?;

    if key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(key);
    let path = config.save()?;

    println!("Saved configuration to {}", path.display());
    println!("Note: New API keys may take up to 2 hours to activate.");

    Ok(ExitCode::SUCCESS)
}

async fn show(client: &WeatherClient, city: &str, json: bool) -> anyhow::Result<ExitCode> {
    let result = client.fetch_weather(city).await;

    match (&result, json) {
        (Ok(reading), true) => println!("{}", serde_json::to_string_pretty(reading)?),
        (Ok(reading), false) => print!("{}", render::reading(reading)),
        (Err(err), true) => println!("{}", serde_json::to_string_pretty(err)?),
        (Err(err), false) => eprintln!("{}", render::error(err)),
    }

    Ok(if result.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn interactive(client: &WeatherClient) -> anyhow::Result<ExitCode> {
    let mut session = LookupSession::new();
    println!("{}\n", render::state(session.state()));

    loop {
        let input = match Text::new("City:").prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read city"),
        };

        let ticket = session.begin(input.trim());
        debug!(?ticket, query = input.trim(), "lookup started");
        if !input.trim().is_empty() {
            println!("{}", render::state(session.state()));
        }

        let result = client.fetch_weather(&input).await;
        if !session.complete(ticket, result) {
            debug!(?ticket, "lookup superseded before completion");
        }

        println!("{}\n", render::state(session.state()).trim_end());
    }

    Ok(ExitCode::SUCCESS)
}
