//! Fishing suitability engine.
//!
//! Per day: score each complete hour ([`hourly`]), pick an adaptive cutoff
//! ([`threshold`]), find contiguous runs above it ([`windows`]) and fold the
//! best run into a day score ([`aggregate`]). Everything here is pure: no I/O,
//! no shared state, identical input gives identical output.

pub mod aggregate;
pub mod hourly;
pub mod threshold;
pub mod windows;

use std::collections::HashMap;

use chrono::{NaiveDate, Timelike};

use crate::models::{
    DailyExtremes, DayConditions, DayMarkers, DayResult, ForecastInput, HourSample,
    HourlyObservation, ScoredHour, Window,
};

/// Score every forecast day, preserving the provider's day order.
pub fn compute_daily(input: &ForecastInput) -> Vec<DayResult> {
    // Group hourly rows by calendar day once
    let mut by_day: HashMap<NaiveDate, Vec<&HourlyObservation>> = HashMap::new();
    for obs in &input.hourly {
        by_day.entry(obs.time.date()).or_default().push(obs);
    }

    input
        .days
        .iter()
        .map(|date| {
            let observations = by_day.get(date).map(Vec::as_slice).unwrap_or(&[]);
            let markers = input.markers.get(date).copied().unwrap_or_default();
            let extremes = input.extremes.get(date).copied().unwrap_or_default();
            score_day(*date, observations, &markers, &extremes)
        })
        .collect()
}

/// Run the full per-day chain: samples → scores → threshold → windows → verdict.
pub fn score_day(
    date: NaiveDate,
    observations: &[&HourlyObservation],
    markers: &DayMarkers,
    extremes: &DailyExtremes,
) -> DayResult {
    let samples = day_samples(observations);
    let skipped = observations.len() - samples.len();

    let hours: Vec<ScoredHour> = samples
        .into_iter()
        .map(|s| hourly::score(s, markers))
        .collect();
    let scores: Vec<u32> = hours.iter().map(|h| h.score).collect();

    let threshold = threshold::select_threshold(&scores);
    let best_windows = windows::extract_windows(&hours, threshold);
    let verdict =
        aggregate::aggregate(best_windows.first(), &scores, markers.moon_phase_or_neutral());

    log::debug!(
        "{date}: {} hours ({skipped} skipped), threshold {threshold}, {} windows, score {} ({})",
        hours.len(),
        best_windows.len(),
        verdict.day_score,
        verdict.classification.label(),
    );

    DayResult {
        date,
        day_score: verdict.day_score,
        classification: verdict.classification,
        moon_percent: verdict.moon_percent,
        threshold,
        conditions: day_conditions(&hours, best_windows.first(), extremes),
        best_windows,
        hours,
        markers: *markers,
    }
}

/// Complete hours for one day, ascending by hour. Rows missing any weather
/// field are dropped rather than imputed; a repeated hour keeps its first row.
fn day_samples(observations: &[&HourlyObservation]) -> Vec<HourSample> {
    let mut samples: Vec<HourSample> = observations
        .iter()
        .filter_map(|obs| {
            Some(HourSample {
                hour: obs.time.hour(),
                wind: obs.wind?,
                pressure: obs.pressure?,
                temperature: obs.temperature?,
            })
        })
        .collect();

    samples.sort_by_key(|s| s.hour);
    samples.dedup_by_key(|s| s.hour);
    samples
}

fn day_conditions(
    hours: &[ScoredHour],
    best: Option<&Window>,
    extremes: &DailyExtremes,
) -> DayConditions {
    let Some(window) = best else {
        // No window: only the temperature midpoint is meaningful
        let temperature_avg = match (extremes.temperature_max, extremes.temperature_min) {
            (Some(max), Some(min)) => Some(((max + min) / 2.0).round() as i64),
            _ => None,
        };
        return DayConditions { temperature_avg, ..Default::default() };
    };

    DayConditions {
        wind_avg: aggregate::window_average(hours, window, |h| h.sample.wind),
        pressure_avg: aggregate::window_average(hours, window, |h| h.sample.pressure),
        temperature_avg: aggregate::window_average(hours, window, |h| h.sample.temperature),
    }
}
