use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::scoring::aggregate::Classification;

/// One hour of weather for a single day (local time).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourSample {
    /// Hour of day, 0-23
    pub hour: u32,
    /// Wind speed in km/h
    pub wind: f64,
    /// Mean sea-level pressure in hPa
    pub pressure: f64,
    /// Air temperature in °C
    pub temperature: f64,
}

/// An hour after the score model has run over it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredHour {
    #[serde(flatten)]
    pub sample: HourSample,
    pub score: u32,
}

impl ScoredHour {
    pub fn hour(&self) -> u32 {
        self.sample.hour
    }
}

/// Per-day astronomical reference points, as fractional local hours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DayMarkers {
    pub sunrise: Option<f64>,
    pub sunset: Option<f64>,
    pub moonrise: Option<f64>,
    pub moonset: Option<f64>,
    /// 0.0 = new moon, 0.5 = full. `None` when astronomy data is unavailable.
    pub moon_phase: Option<f64>,
}

/// Phase used when the astronomy source had nothing for the day.
pub const NEUTRAL_MOON_PHASE: f64 = 0.5;

impl DayMarkers {
    pub fn moon_phase_or_neutral(&self) -> f64 {
        self.moon_phase.unwrap_or(NEUTRAL_MOON_PHASE)
    }
}

/// A raw hourly row from the weather provider. Any field may be missing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyObservation {
    pub time: NaiveDateTime,
    pub wind: Option<f64>,
    pub pressure: Option<f64>,
    pub temperature: Option<f64>,
}

/// Daily extremes from the provider, used only for display fallbacks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DailyExtremes {
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
}

/// Everything the daily pipeline needs for one location.
#[derive(Debug, Clone, Default)]
pub struct ForecastInput {
    /// Calendar days in provider order.
    pub days: Vec<NaiveDate>,
    pub hourly: Vec<HourlyObservation>,
    /// Astronomical markers by day. Days without an entry get no boosts.
    pub markers: HashMap<NaiveDate, DayMarkers>,
    pub extremes: HashMap<NaiveDate, DailyExtremes>,
}

/// A ranked contiguous span of qualifying hours, `[start_hour, end_hour)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub start_hour: u32,
    pub end_hour: u32,
    pub average_score: f64,
    pub length_hours: u32,
}

impl Window {
    /// Half-open hour range, e.g. "14:00-17:00".
    pub fn label(&self) -> String {
        format!("{:02}:00-{:02}:00", self.start_hour, self.end_hour)
    }

    pub fn contains(&self, hour: u32) -> bool {
        (self.start_hour..self.end_hour).contains(&hour)
    }
}

// JSON consumers get the display label alongside the raw hours.
impl Serialize for Window {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Window", 5)?;
        s.serialize_field("start_hour", &self.start_hour)?;
        s.serialize_field("end_hour", &self.end_hour)?;
        s.serialize_field("average_score", &self.average_score)?;
        s.serialize_field("length_hours", &self.length_hours)?;
        s.serialize_field("label", &self.label())?;
        s.end()
    }
}

/// Rounded weather averages shown next to a day's score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DayConditions {
    pub wind_avg: Option<i64>,
    pub pressure_avg: Option<i64>,
    pub temperature_avg: Option<i64>,
}

/// The scored outcome for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayResult {
    pub date: NaiveDate,
    pub day_score: u32,
    pub classification: Classification,
    pub moon_percent: u32,
    pub threshold: u32,
    pub best_windows: Vec<Window>,
    pub conditions: DayConditions,
    /// The day's scored hours, for detail views.
    pub hours: Vec<ScoredHour>,
    pub markers: DayMarkers,
}

impl DayResult {
    /// Window labels in rank order.
    pub fn best_hours(&self) -> Vec<String> {
        self.best_windows.iter().map(Window::label).collect()
    }

    /// Whether an hour sits inside one of the ranked windows.
    pub fn in_window(&self, hour: u32) -> bool {
        self.best_windows.iter().any(|w| w.contains(hour))
    }
}
