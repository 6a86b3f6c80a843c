use std::collections::HashMap;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{Location, ProviderError, Result};
use crate::config::{ProviderConfig, clamp_forecast_days};
use crate::models::{DailyExtremes, DayMarkers, ForecastInput, HourlyObservation};

const HOURLY_VARS: &str = "windspeed_10m,pressure_msl,temperature_2m";
const DAILY_VARS: &str = "sunrise,sunset,temperature_2m_max,temperature_2m_min";
const ASTRONOMY_VARS: &str = "moon_phase,moonrise,moonset";

/// Open-Meteo forecast response (partial — hourly weather plus daily sun times).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForecastResponse {
    pub hourly: HourlyBlock,
    pub daily: DailyBlock,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HourlyBlock {
    pub time: Vec<String>,
    #[serde(alias = "wind_speed_10m")]
    pub windspeed_10m: Vec<Option<f64>>,
    pub pressure_msl: Vec<Option<f64>>,
    pub temperature_2m: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DailyBlock {
    pub time: Vec<String>,
    pub sunrise: Vec<Option<String>>,
    pub sunset: Vec<Option<String>>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
}

/// Open-Meteo astronomy response.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AstronomyResponse {
    pub daily: AstronomyDaily,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AstronomyDaily {
    pub time: Vec<String>,
    pub moon_phase: Vec<Option<f64>>,
    pub moonrise: Vec<Option<String>>,
    pub moonset: Vec<Option<String>>,
}

/// Fetch hourly weather and daily sun times.
pub fn fetch_forecast(
    agent: &ureq::Agent,
    config: &ProviderConfig,
    location: &Location,
    days: u32,
) -> Result<ForecastResponse> {
    log::debug!("Fetching forecast from {}", config.forecast_url);
    agent
        .get(&config.forecast_url)
        .query("latitude", location.latitude.to_string())
        .query("longitude", location.longitude.to_string())
        .query("timezone", "auto")
        .query("forecast_days", clamp_forecast_days(days).to_string())
        .query("hourly", HOURLY_VARS)
        .query("daily", DAILY_VARS)
        .header("User-Agent", config.user_agent.as_str())
        .call()
        .map_err(ProviderError::Forecast)?
        .body_mut()
        .read_json()
        .map_err(ProviderError::Forecast)
}

/// Fetch moon phase and moonrise/moonset.
pub fn fetch_astronomy(
    agent: &ureq::Agent,
    config: &ProviderConfig,
    location: &Location,
    days: u32,
) -> Result<AstronomyResponse> {
    log::debug!("Fetching moon data from {}", config.astronomy_url);
    agent
        .get(&config.astronomy_url)
        .query("latitude", location.latitude.to_string())
        .query("longitude", location.longitude.to_string())
        .query("timezone", "auto")
        .query("forecast_days", clamp_forecast_days(days).to_string())
        .query("daily", ASTRONOMY_VARS)
        .header("User-Agent", config.user_agent.as_str())
        .call()
        .map_err(ProviderError::Astronomy)?
        .body_mut()
        .read_json()
        .map_err(ProviderError::Astronomy)
}

/// Read a saved provider response from disk.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path).map_err(|source| ProviderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&contents)?)
}

/// Convert provider responses into engine input.
///
/// Forecast date keys must parse; a bad hourly timestamp only drops that row,
/// and a bad astronomy row only loses that day's moon data.
pub fn into_input(
    forecast: ForecastResponse,
    astronomy: Option<AstronomyResponse>,
) -> Result<ForecastInput> {
    let daily = &forecast.daily;
    let days = parse_dates(&daily.time)?;

    let mut markers: HashMap<NaiveDate, DayMarkers> = HashMap::new();
    let mut extremes: HashMap<NaiveDate, DailyExtremes> = HashMap::new();

    for (i, date) in days.iter().enumerate() {
        markers.insert(
            *date,
            DayMarkers {
                sunrise: marker_hour(&daily.sunrise, i, *date),
                sunset: marker_hour(&daily.sunset, i, *date),
                ..Default::default()
            },
        );
        extremes.insert(
            *date,
            DailyExtremes {
                temperature_max: value_at(&daily.temperature_2m_max, i),
                temperature_min: value_at(&daily.temperature_2m_min, i),
            },
        );
    }

    if let Some(astro) = astronomy {
        merge_astronomy(&mut markers, &astro.daily);
    }

    let hourly = parse_hourly(&forecast.hourly);
    log::debug!("Provider data: {} days, {} hourly rows", days.len(), hourly.len());

    Ok(ForecastInput { days, hourly, markers, extremes })
}

fn parse_dates(raw: &[String]) -> Result<Vec<NaiveDate>> {
    raw.iter()
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| ProviderError::InvalidResponse(format!("bad date {s:?}")))
        })
        .collect()
}

fn merge_astronomy(markers: &mut HashMap<NaiveDate, DayMarkers>, astro: &AstronomyDaily) {
    for (i, raw) in astro.time.iter().enumerate() {
        let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") else {
            log::warn!("Skipping moon data row with bad date {raw:?}");
            continue;
        };
        // Only days the forecast knows about
        let Some(m) = markers.get_mut(&date) else {
            continue;
        };
        m.moon_phase = value_at(&astro.moon_phase, i);
        m.moonrise = marker_hour(&astro.moonrise, i, date);
        m.moonset = marker_hour(&astro.moonset, i, date);
    }
}

fn parse_hourly(block: &HourlyBlock) -> Vec<HourlyObservation> {
    let mut rows = Vec::with_capacity(block.time.len());
    for (j, raw) in block.time.iter().enumerate() {
        let Some(time) = parse_timestamp(raw) else {
            log::warn!("Skipping hourly row with bad timestamp {raw:?}");
            continue;
        };
        rows.push(HourlyObservation {
            time,
            wind: value_at(&block.windspeed_10m, j),
            pressure: value_at(&block.pressure_msl, j),
            temperature: value_at(&block.temperature_2m, j),
        });
    }
    rows
}

fn value_at(values: &[Option<f64>], idx: usize) -> Option<f64> {
    values.get(idx).copied().flatten()
}

/// Local timestamps come as "2025-06-01T05:42", occasionally with seconds.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// Time of day as fractional hours, e.g. 05:45 → 5.75.
pub fn fractional_hour(t: &NaiveDateTime) -> f64 {
    t.hour() as f64 + t.minute() as f64 / 60.0 + t.second() as f64 / 3600.0
}

/// Fractional hour of a marker timestamp, if it falls on `date`.
/// Moonrise/moonset can land on a neighbouring day; those are dropped.
fn marker_hour(values: &[Option<String>], idx: usize, date: NaiveDate) -> Option<f64> {
    let raw = values.get(idx)?.as_deref()?;
    let t = parse_timestamp(raw)?;
    (t.date() == date).then(|| fractional_hour(&t))
}
