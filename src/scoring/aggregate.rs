use serde::Serialize;

use crate::models::{ScoredHour, Window};

/// Day score used when a day has no scored hours at all.
pub const DEFAULT_DAY_SCORE: u32 = 50;

/// Three-tier verdict for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    GreatDay,
    FairChance,
    Poor,
}

impl Classification {
    pub fn from_score(day_score: u32) -> Self {
        if day_score >= 70 {
            Self::GreatDay
        } else if day_score >= 45 {
            Self::FairChance
        } else {
            Self::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::GreatDay => "great day",
            Self::FairChance => "fair chance",
            Self::Poor => "poor",
        }
    }

    /// Display colour (hex).
    pub fn color(&self) -> &'static str {
        match self {
            Self::GreatDay => "#10b981",
            Self::FairChance => "#f59e0b",
            Self::Poor => "#ef4444",
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            Self::GreatDay => "🟢 Great",
            Self::FairChance => "🟠 Fair",
            Self::Poor => "🔴 Poor",
        }
    }
}

/// The aggregated verdict for a day, before the pipeline attaches context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayVerdict {
    pub day_score: u32,
    pub classification: Classification,
    pub moon_percent: u32,
}

/// Fold the best window (or, failing that, the raw hourly scores) and the
/// moon phase into one day score.
pub fn aggregate(best_window: Option<&Window>, all_scores: &[u32], moon_phase: f64) -> DayVerdict {
    let day_score = match best_window {
        Some(w) => round_score(w.average_score),
        None if all_scores.is_empty() => DEFAULT_DAY_SCORE,
        None => {
            let total: u32 = all_scores.iter().sum();
            round_score(total as f64 / all_scores.len() as f64)
        }
    };

    DayVerdict {
        day_score,
        classification: Classification::from_score(day_score),
        moon_percent: moon_percent(moon_phase),
    }
}

/// Moon phase fraction (0-1) as a whole percentage.
pub fn moon_percent(phase: f64) -> u32 {
    if phase.is_nan() {
        return 50;
    }
    (phase.clamp(0.0, 1.0) * 100.0).round() as u32
}

fn round_score(v: f64) -> u32 {
    v.round().clamp(0.0, 100.0) as u32
}

/// Mean of a field over the hours inside `window`, rounded.
pub fn window_average<F>(hours: &[ScoredHour], window: &Window, field: F) -> Option<i64>
where
    F: Fn(&ScoredHour) -> f64,
{
    let vals: Vec<f64> = hours
        .iter()
        .filter(|h| window.contains(h.hour()))
        .map(field)
        .collect();
    if vals.is_empty() {
        return None;
    }
    Some((vals.iter().sum::<f64>() / vals.len() as f64).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HourSample;

    fn window(avg: f64) -> Window {
        Window { start_hour: 14, end_hour: 17, average_score: avg, length_hours: 3 }
    }

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(Classification::from_score(100), Classification::GreatDay);
        assert_eq!(Classification::from_score(70), Classification::GreatDay);
        assert_eq!(Classification::from_score(69), Classification::FairChance);
        assert_eq!(Classification::from_score(45), Classification::FairChance);
        assert_eq!(Classification::from_score(44), Classification::Poor);
        assert_eq!(Classification::from_score(0), Classification::Poor);
    }

    #[test]
    fn test_presentation_metadata() {
        assert_eq!(Classification::GreatDay.label(), "great day");
        assert_eq!(Classification::FairChance.color(), "#f59e0b");
        assert_eq!(Classification::Poor.badge(), "🔴 Poor");
    }

    #[test]
    fn test_day_score_from_best_window() {
        let v = aggregate(Some(&window(75.0)), &[10, 20, 30], 0.5);
        assert_eq!(v.day_score, 75);
        assert_eq!(v.classification, Classification::GreatDay);

        // Rounded, not truncated
        let v = aggregate(Some(&window(69.5)), &[], 0.5);
        assert_eq!(v.day_score, 70);
    }

    #[test]
    fn test_day_score_falls_back_to_mean() {
        let v = aggregate(None, &[40, 50, 61], 0.5);
        // 151 / 3 = 50.33
        assert_eq!(v.day_score, 50);
        assert_eq!(v.classification, Classification::FairChance);
    }

    #[test]
    fn test_day_score_default_without_hours() {
        let v = aggregate(None, &[], 0.5);
        assert_eq!(v.day_score, 50);
    }

    #[test]
    fn test_moon_percent() {
        assert_eq!(moon_percent(0.5), 50);
        assert_eq!(moon_percent(0.0), 0);
        assert_eq!(moon_percent(1.0), 100);
        assert_eq!(moon_percent(0.255), 26);
        assert_eq!(moon_percent(f64::NAN), 50);
        assert_eq!(aggregate(None, &[], 0.73).moon_percent, 73);
    }

    #[test]
    fn test_moon_does_not_move_day_score() {
        let a = aggregate(Some(&window(60.0)), &[], 0.0);
        let b = aggregate(Some(&window(60.0)), &[], 1.0);
        assert_eq!(a.day_score, b.day_score);
    }

    #[test]
    fn test_window_average() {
        let hours: Vec<ScoredHour> = (12..18)
            .map(|h| ScoredHour {
                sample: HourSample {
                    hour: h,
                    wind: h as f64,
                    pressure: 1010.0,
                    temperature: 18.4,
                },
                score: 80,
            })
            .collect();
        let w = window(80.0);
        // Hours 14, 15, 16
        assert_eq!(window_average(&hours, &w, |h| h.sample.wind), Some(15));
        assert_eq!(window_average(&hours, &w, |h| h.sample.temperature), Some(18));

        let elsewhere = Window { start_hour: 2, end_hour: 4, average_score: 80.0, length_hours: 2 };
        assert_eq!(window_average(&hours, &elsewhere, |h| h.sample.wind), None);
    }
}
