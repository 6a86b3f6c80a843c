use crate::models::{DayMarkers, HourSample, ScoredHour};

// ── Weather fitness ───────────────────────────────────────────────────
// Each term is a Gaussian proximity to an ideal value, peaking at 100.

const WIND_IDEAL: f64 = 8.0;
const WIND_SIGMA: f64 = 4.5;
const WIND_WEIGHT: f64 = 0.5;

const PRESSURE_IDEAL: f64 = 1015.0;
const PRESSURE_SIGMA: f64 = 5.5;
const PRESSURE_WEIGHT: f64 = 0.3;

const TEMPERATURE_IDEAL: f64 = 18.0;
const TEMPERATURE_SIGMA: f64 = 4.0;
const TEMPERATURE_WEIGHT: f64 = 0.2;

// ── Twilight / lunar boosts ───────────────────────────────────────────
// Additive bumps centred on the marker hour, saturating at 100.

const TWILIGHT_PEAK: f64 = 28.0;
const TWILIGHT_SIGMA: f64 = 1.2;

const LUNAR_PEAK: f64 = 6.0;
const LUNAR_SIGMA: f64 = 1.0;

const MAX_SCORE: f64 = 100.0;

/// Unnormalised Gaussian, 1.0 at `x == center`.
fn gaussian(x: f64, center: f64, sigma: f64) -> f64 {
    let z = (x - center) / sigma;
    (-0.5 * z * z).exp()
}

/// Weighted weather fitness before any boost, clamped to 0-100.
pub fn weather_fitness(sample: &HourSample) -> f64 {
    let wind = 100.0 * gaussian(sample.wind, WIND_IDEAL, WIND_SIGMA);
    let pressure = 100.0 * gaussian(sample.pressure, PRESSURE_IDEAL, PRESSURE_SIGMA);
    let temperature = 100.0 * gaussian(sample.temperature, TEMPERATURE_IDEAL, TEMPERATURE_SIGMA);

    let fitness =
        WIND_WEIGHT * wind + PRESSURE_WEIGHT * pressure + TEMPERATURE_WEIGHT * temperature;
    // NaN inputs collapse to zero rather than poisoning the clamp
    if fitness.is_nan() {
        return 0.0;
    }
    fitness.clamp(0.0, MAX_SCORE)
}

/// Points a twilight marker adds at `hour`.
pub fn twilight_boost(hour: f64, marker: f64) -> f64 {
    TWILIGHT_PEAK * gaussian(hour, marker, TWILIGHT_SIGMA)
}

/// Points a moonrise/moonset marker adds at `hour`.
pub fn lunar_boost(hour: f64, marker: f64) -> f64 {
    LUNAR_PEAK * gaussian(hour, marker, LUNAR_SIGMA)
}

fn add_clamped(score: f64, boost: f64) -> f64 {
    if boost.is_nan() {
        return score;
    }
    (score + boost).min(MAX_SCORE)
}

/// Score one hour 0-100.
///
/// Boosts are applied in a fixed order (sunrise, sunset, moonrise, moonset),
/// each clamped to 100 before the next is added. When boosts jointly overflow
/// the order decides what gets discarded, so it must not be rearranged.
pub fn score_hour(sample: &HourSample, markers: &DayMarkers) -> u32 {
    let hour = sample.hour as f64;
    let mut score = weather_fitness(sample);

    for marker in [markers.sunrise, markers.sunset].into_iter().flatten() {
        score = add_clamped(score, twilight_boost(hour, marker));
    }
    for marker in [markers.moonrise, markers.moonset].into_iter().flatten() {
        score = add_clamped(score, lunar_boost(hour, marker));
    }

    score.round().clamp(0.0, MAX_SCORE) as u32
}

/// Score a sample and freeze the result.
pub fn score(sample: HourSample, markers: &DayMarkers) -> ScoredHour {
    ScoredHour {
        score: score_hour(&sample, markers),
        sample,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(hour: u32, wind: f64, pressure: f64, temperature: f64) -> HourSample {
        HourSample { hour, wind, pressure, temperature }
    }

    /// Poor weather so boosts are visible without saturating.
    fn rough(hour: u32) -> HourSample {
        sample(hour, 20.0, 1000.0, 5.0)
    }

    #[test]
    fn test_ideal_point_is_peak() {
        let s = sample(12, 8.0, 1015.0, 18.0);
        assert!((weather_fitness(&s) - 100.0).abs() < 1e-9);
        assert_eq!(score_hour(&s, &DayMarkers::default()), 100);
    }

    #[test]
    fn test_scores_in_range() {
        let markers = DayMarkers {
            sunrise: Some(6.0),
            sunset: Some(6.5),
            moonrise: Some(6.0),
            moonset: Some(7.0),
            moon_phase: Some(1.0),
        };
        for hour in 0..24 {
            for &(w, p, t) in &[
                (0.0, 950.0, -20.0),
                (8.0, 1015.0, 18.0),
                (120.0, 1080.0, 45.0),
                (-5.0, 0.0, 0.0),
                (7.0, 1013.0, 17.0),
            ] {
                let s = score_hour(&sample(hour, w, p, t), &markers);
                assert!(s <= 100, "hour {hour} ({w},{p},{t}) scored {s}");
            }
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        // Only wind ideal: 50 points from wind, the rest negligible
        let s = sample(12, 8.0, 1200.0, 80.0);
        assert!((weather_fitness(&s) - 50.0).abs() < 1e-6);

        let s = sample(12, 200.0, 1015.0, 80.0);
        assert!((weather_fitness(&s) - 30.0).abs() < 1e-6);

        let s = sample(12, 200.0, 1200.0, 18.0);
        assert!((weather_fitness(&s) - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_twilight_boost_peaks_at_marker() {
        let at = twilight_boost(6.25, 6.25);
        assert!((at - 28.0).abs() < 1e-12);

        let mut prev = at;
        for step in 1..=12 {
            let b = twilight_boost(6.25 + step as f64 * 0.5, 6.25);
            assert!(b < prev, "boost should strictly decrease, step {step}");
            prev = b;
        }
        // Symmetric either side
        assert!((twilight_boost(5.0, 6.0) - twilight_boost(7.0, 6.0)).abs() < 1e-12);
    }

    #[test]
    fn test_lunar_boost_peaks_at_marker() {
        assert!((lunar_boost(22.0, 22.0) - 6.0).abs() < 1e-12);
        assert!(lunar_boost(21.0, 22.0) < 6.0);
        assert!(lunar_boost(19.0, 22.0) < lunar_boost(21.0, 22.0));
    }

    #[test]
    fn test_sunrise_lifts_nearby_hours() {
        let markers = DayMarkers { sunrise: Some(6.0), ..Default::default() };
        let none = DayMarkers::default();

        // Base ~2.3; bumps ~28, ~19.8, ~7.0, ~1.2 at distance 0-3h
        let at = score_hour(&rough(6), &markers);
        let one = score_hour(&rough(7), &markers);
        let two = score_hour(&rough(8), &markers);
        let three = score_hour(&rough(9), &markers);
        assert_eq!(score_hour(&rough(6), &none), 2);
        assert_eq!(at, 30);
        assert_eq!(one, 22);
        assert!(at > one && one > two && two > three);
        // Hour before sunrise mirrors the hour after
        assert_eq!(score_hour(&rough(5), &markers), one);
    }

    #[test]
    fn test_boosted_score_saturates() {
        let markers = DayMarkers {
            sunrise: Some(12.0),
            sunset: Some(12.0),
            moonrise: Some(12.0),
            moonset: Some(12.0),
            moon_phase: None,
        };
        let s = sample(12, 8.0, 1015.0, 18.0);
        assert_eq!(score_hour(&s, &markers), 100);
    }

    #[test]
    fn test_lunar_markers_optional() {
        let with_moon = DayMarkers { moonrise: Some(14.0), ..Default::default() };
        let without = DayMarkers::default();
        let s = rough(14);
        assert_eq!(score_hour(&s, &with_moon), score_hour(&s, &without) + 6);
    }

    #[test]
    fn test_score_freezes_sample() {
        let s = sample(9, 8.0, 1015.0, 18.0);
        let scored = score(s, &DayMarkers::default());
        assert_eq!(scored.sample, s);
        assert_eq!(scored.score, 100);
        assert_eq!(scored.hour(), 9);
    }

    #[test]
    fn test_nan_input_scores_zero() {
        let s = sample(3, f64::NAN, 1015.0, 18.0);
        assert_eq!(score_hour(&s, &DayMarkers::default()), 0);
    }
}
