//! Upstream data: location lookup, weather forecast and moon data.
//!
//! Feeds the scoring engine; nothing in here scores anything.

pub mod geocode;
pub mod open_meteo;

use std::time::Duration;

use thiserror::Error;

use crate::config::ProviderConfig;
use crate::models::ForecastInput;

pub use geocode::{Location, resolve_location};

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Place not found: {0}")]
    PlaceNotFound(String),
    #[error("Invalid coordinates {0}: latitude must be within ±90 and longitude within ±180")]
    InvalidCoordinates(String),
    #[error("Geocoding service unreachable: {0}")]
    Geocoding(#[source] ureq::Error),
    #[error("Weather data unavailable: {0}")]
    Forecast(#[source] ureq::Error),
    #[error("Moon data unavailable: {0}")]
    Astronomy(#[source] ureq::Error),
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProviderError>;

/// HTTP agent shared by all requests of one query.
pub fn build_agent(config: &ProviderConfig) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
        .build()
        .into()
}

/// Fetch forecast and moon data concurrently and convert them into engine
/// input. A forecast failure is fatal; a moon-data failure only drops the
/// lunar boost and phase for every day.
pub fn fetch_forecast_input(
    config: &ProviderConfig,
    location: &Location,
    days: u32,
) -> Result<ForecastInput> {
    let agent = build_agent(config);

    let (forecast, astronomy) = rayon::join(
        || open_meteo::fetch_forecast(&agent, config, location, days),
        || open_meteo::fetch_astronomy(&agent, config, location, days),
    );

    open_meteo::into_input(forecast?, recover_astronomy(astronomy))
}

/// Moon data is optional: any failure becomes "no moon data" plus a warning.
fn recover_astronomy(
    astronomy: Result<open_meteo::AstronomyResponse>,
) -> Option<open_meteo::AstronomyResponse> {
    match astronomy {
        Ok(a) => Some(a),
        Err(e) => {
            log::warn!("{e}; continuing without moon data");
            None
        }
    }
}
