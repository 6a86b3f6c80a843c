//! Plain-text tables for the terminal.

use std::fmt;

use crate::models::DayResult;

fn or_dash(v: Option<i64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Fractional hour as "HH:MM", rounded to the nearest whole minute.
fn clock(h: f64) -> String {
    let mins = (h * 60.0).round() as u32;
    format!("{:02}:{:02}", mins / 60, mins % 60)
}

fn clock_or_dash(v: Option<f64>) -> String {
    v.map(clock).unwrap_or_else(|| "-".to_string())
}

/// One row per day: verdict, moon, cutoff, windows and the window's averages.
pub struct DaysTable<'a> {
    pub place: &'a str,
    pub days: &'a [DayResult],
}

impl fmt::Display for DaysTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} — {} days", self.place, self.days.len())?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<10} {:<9} {:>5}  {:<11} {:>4} {:>4}  {:<35} {:>4} {:>5} {:>4}",
            "Date", "", "Score", "Verdict", "Moon", "Cut", "Best windows", "Wind", "hPa", "°C"
        )?;
        writeln!(f, "{}", "-".repeat(104))?;

        for d in self.days {
            let windows = if d.best_windows.is_empty() {
                "—".to_string()
            } else {
                d.best_windows
                    .iter()
                    .map(|w| format!("{} ({:.0})", w.label(), w.average_score))
                    .collect::<Vec<_>>()
                    .join(", ")
            };

            writeln!(
                f,
                "{:<10} {:<9} {:>5}  {:<11} {:>3}% {:>4}  {:<35} {:>4} {:>5} {:>4}",
                d.date.format("%a %d %b").to_string(),
                d.classification.badge(),
                d.day_score,
                d.classification.label(),
                d.moon_percent,
                d.threshold,
                windows,
                or_dash(d.conditions.wind_avg),
                or_dash(d.conditions.pressure_avg),
                or_dash(d.conditions.temperature_avg),
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Cut = qualifying score for that day; window averages in parentheses")
    }
}

/// Per-hour breakdown of a single day.
pub struct HoursTable<'a>(pub &'a DayResult);

impl fmt::Display for HoursTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let day = self.0;
        writeln!(
            f,
            "{}: {} {} ({}), cutoff {}",
            day.date,
            day.classification.badge(),
            day.day_score,
            day.classification.label(),
            day.threshold
        )?;

        let m = &day.markers;
        writeln!(
            f,
            "Sunrise {}  Sunset {}  Moonrise {}  Moonset {}  Moon {}%",
            clock_or_dash(m.sunrise),
            clock_or_dash(m.sunset),
            clock_or_dash(m.moonrise),
            clock_or_dash(m.moonset),
            day.moon_percent
        )?;
        writeln!(f)?;
        writeln!(f, "{:<5} {:>6} {:>7} {:>6} {:>5}", "Hour", "Wind", "hPa", "°C", "Score")?;
        writeln!(f, "{}", "-".repeat(34))?;

        for h in &day.hours {
            let mark = if day.in_window(h.hour()) { " *" } else { "" };
            writeln!(
                f,
                "{:02}:00 {:>6.1} {:>7.1} {:>6.1} {:>5}{}",
                h.hour(),
                h.sample.wind,
                h.sample.pressure,
                h.sample.temperature,
                h.score,
                mark
            )?;
        }

        if day.hours.is_empty() {
            writeln!(f, "(no complete hourly data)")?;
        }
        writeln!(f)?;
        writeln!(f, "* = inside a ranked window")
    }
}

pub fn format_days(place: &str, days: &[DayResult]) -> String {
    DaysTable { place, days }.to_string()
}

pub fn format_hours(day: &DayResult) -> String {
    HoursTable(day).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayConditions, DayMarkers, HourSample, ScoredHour, Window};
    use crate::scoring::aggregate::Classification;
    use chrono::NaiveDate;

    fn result() -> DayResult {
        DayResult {
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            day_score: 75,
            classification: Classification::GreatDay,
            moon_percent: 18,
            threshold: 70,
            best_windows: vec![Window {
                start_hour: 14,
                end_hour: 16,
                average_score: 75.0,
                length_hours: 2,
            }],
            conditions: DayConditions { wind_avg: Some(8), pressure_avg: None, temperature_avg: Some(18) },
            hours: vec![
                ScoredHour {
                    sample: HourSample { hour: 13, wind: 20.0, pressure: 1009.0, temperature: 15.0 },
                    score: 40,
                },
                ScoredHour {
                    sample: HourSample { hour: 14, wind: 8.0, pressure: 1015.0, temperature: 18.0 },
                    score: 80,
                },
            ],
            markers: DayMarkers { sunrise: Some(5.55), ..Default::default() },
        }
    }

    #[test]
    fn test_format_days() {
        let text = format_days("Coordinates: 41.0000, 29.0000", &[result()]);
        assert!(text.starts_with("Coordinates: 41.0000, 29.0000 — 1 days"));
        assert!(text.contains("Sun 01 Jun"));
        assert!(text.contains("great day"));
        assert!(text.contains("14:00-16:00 (75)"));
        assert!(text.contains("18%"));
    }

    #[test]
    fn test_format_days_without_windows() {
        let mut r = result();
        r.best_windows.clear();
        let text = format_days("x", &[r]);
        assert!(text.contains("—"));
    }

    #[test]
    fn test_format_hours_marks_window() {
        let text = format_hours(&result());
        assert!(text.contains("Sunrise 05:33"));
        assert!(text.contains("Sunset -"));
        let line_14 = text.lines().find(|l| l.starts_with("14:00")).unwrap();
        assert!(line_14.ends_with(" *"));
        let line_13 = text.lines().find(|l| l.starts_with("13:00")).unwrap();
        assert!(!line_13.ends_with('*'));
    }

    #[test]
    fn test_clock_rounds_to_whole_minutes() {
        assert_eq!(clock(5.55), "05:33");
        assert_eq!(clock(0.0), "00:00");
        // 05:59:45 rounds up into the next hour
        assert_eq!(clock(5.0 + 59.75 / 60.0), "06:00");
        assert_eq!(clock(20.0 + 29.4 / 60.0), "20:29");
    }

    #[test]
    fn test_format_hours_late_marker_rolls_over() {
        let mut r = result();
        r.markers.sunset = Some(19.0 + 59.75 / 60.0);
        let text = format_hours(&r);
        assert!(text.contains("Sunset 20:00"));
        assert!(!text.contains("19:59"));
    }
}
