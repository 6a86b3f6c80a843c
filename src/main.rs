use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use fishcast::config::AppConfig;
use fishcast::models::DayResult;
use fishcast::provider::open_meteo::{self, AstronomyResponse, ForecastResponse};
use fishcast::{provider, report, scoring};

#[derive(Parser)]
#[command(name = "fishcast", version, about = "Best hours to go fishing, from the weather forecast")]
struct Cli {
    /// Path to a config file (defaults to the XDG config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the forecast for a place and rank each day
    Forecast {
        /// Place name or "lat, lon" (defaults to config default_place)
        place: Option<String>,

        /// Number of forecast days (1-7)
        #[arg(short, long)]
        days: Option<u32>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Score saved Open-Meteo responses without touching the network
    Score {
        /// Forecast response (hourly wind/pressure/temperature, daily sunrise/sunset)
        #[arg(long)]
        forecast: PathBuf,

        /// Astronomy response (daily moon_phase/moonrise/moonset)
        #[arg(long)]
        astronomy: Option<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Hour-by-hour breakdown of one forecast day
    Hours {
        /// Place name or "lat, lon" (defaults to config default_place)
        place: Option<String>,

        /// Day to show (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Number of forecast days to fetch (1-7)
        #[arg(short, long)]
        days: Option<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = AppConfig::load(cli.config.as_deref());

    match cli.command {
        Commands::Forecast { place, days, json } => {
            let (place_name, results) = fetch_and_score(&config, place, days)?;
            if json {
                print_json(&results)?;
            } else {
                print!("{}", report::format_days(&place_name, &results));
            }
        }

        Commands::Score { forecast, astronomy, json } => {
            let forecast: ForecastResponse = open_meteo::read_json_file(&forecast)
                .with_context(|| format!("Failed to load forecast {}", forecast.display()))?;
            let astronomy = match astronomy {
                Some(path) => Some(
                    open_meteo::read_json_file::<AstronomyResponse>(&path)
                        .with_context(|| format!("Failed to load astronomy {}", path.display()))?,
                ),
                None => None,
            };

            let input = open_meteo::into_input(forecast, astronomy)
                .context("Failed to read provider data")?;
            let results = scoring::compute_daily(&input);

            if json {
                print_json(&results)?;
            } else {
                print!("{}", report::format_days("Saved forecast", &results));
            }
        }

        Commands::Hours { place, date, days } => {
            let wanted = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .with_context(|| format!("Invalid date {date:?}, expected YYYY-MM-DD"))?;
            let (place_name, results) = fetch_and_score(&config, place, days)?;

            let Some(day) = results.iter().find(|d| d.date == wanted) else {
                let first = results.first().map(|d| d.date.to_string()).unwrap_or_default();
                let last = results.last().map(|d| d.date.to_string()).unwrap_or_default();
                anyhow::bail!("{wanted} is outside the forecast ({first} to {last})");
            };

            println!("{place_name}");
            print!("{}", report::format_hours(day));
        }
    }

    Ok(())
}

/// Resolve the place, fetch provider data and run the daily pipeline.
fn fetch_and_score(
    config: &AppConfig,
    place: Option<String>,
    days: Option<u32>,
) -> Result<(String, Vec<DayResult>)> {
    // Resolve place: CLI > config
    let Some(place) = place.or_else(|| config.default_place.clone()) else {
        anyhow::bail!("No place given. Pass PLACE or set default_place in config.");
    };
    let days = config.resolve_days(days);

    let location = provider::resolve_location(&place, &config.provider)
        .with_context(|| format!("Could not resolve {place:?}"))?;
    let input = provider::fetch_forecast_input(&config.provider, &location, days)
        .context("Failed to fetch forecast")?;

    Ok((location.display_name, scoring::compute_daily(&input)))
}

fn print_json(results: &[DayResult]) -> Result<()> {
    let text = serde_json::to_string_pretty(results).context("Failed to serialize results")?;
    println!("{text}");
    Ok(())
}
