use anyhow::Context;
use clap::{Parser, Subcommand};
use forecast_core::{Config, DayCard, IconId, Query, provider_from_config, run_search};
use inquire::{Confirm, CustomUserError, Password, PasswordDisplayMode, validator::Validation};

use crate::app::App;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "5-day weather forecast viewer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// City to search for as soon as the window opens.
    #[arg(long)]
    pub city: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the forecast window (the default).
    Gui {
        /// City to search for as soon as the window opens.
        #[arg(long)]
        city: Option<String>,
    },

    /// Store the AccuWeather API key and unit preference.
    Configure,

    /// Print the 5-day forecast for a city without opening a window.
    Show {
        /// City name.
        city: String,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.into_command() {
            Command::Gui { city } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;
                App::new(provider)?.run(city.as_deref())
            }
            Command::Configure => configure(),
            Command::Show { city } => show(&city),
        }
    }

    /// The command to run. A top-level `--city` applies to the window when
    /// `gui` does not name one itself.
    fn into_command(self) -> Command {
        match self.command {
            None | Some(Command::Gui { city: None }) => Command::Gui { city: self.city },
            Some(command) => command,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let api_key = Password::new("AccuWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get one at https://developer.accuweather.com/")
        .with_validator(validate_api_key)
        .prompt()
        .context("API key prompt was cancelled")?;
    config.set_api_key(api_key);

    config.metric = Confirm::new("Show temperatures in Celsius?")
        .with_default(config.metric)
        .prompt()
        .context("Unit prompt was cancelled")?;

    config.save_to(&path)?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

fn validate_api_key(input: &str) -> Result<Validation, CustomUserError> {
    if input.trim().is_empty() {
        Ok(Validation::Invalid("The API key must not be empty.".into()))
    } else {
        Ok(Validation::Valid)
    }
}

fn show(city: &str) -> anyhow::Result<()> {
    let query = Query::parse(city)?;
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let cards = runtime.block_on(run_search(provider.as_ref(), &query, |_| {}))?;

    println!("5-day forecast for {query}:");
    for card in &cards {
        println!("{}", format_card(card));
    }
    Ok(())
}

fn format_card(card: &DayCard) -> String {
    let icon = |placeholder: bool, id: IconId| {
        if placeholder { format!("{id} (unavailable)") } else { id.to_string() }
    };

    format!(
        "  {}  {:<16}  day icon {}, night icon {}",
        card.date_label,
        card.temperature_label,
        icon(card.day_icon.placeholder, card.day_icon.id),
        icon(card.night_icon.placeholder, card.night_icon.id),
    )
}
