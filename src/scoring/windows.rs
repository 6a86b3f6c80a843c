use std::cmp::Ordering;

use crate::models::{ScoredHour, Window};

/// Shortest run of qualifying hours worth reporting.
pub const MIN_WINDOW_HOURS: usize = 2;

/// Most windows kept per day.
pub const MAX_WINDOWS: usize = 3;

/// Find contiguous runs of hours scoring at or above `threshold` and return
/// the best few, ranked by average score (ties: longer first).
///
/// Hours must be sorted ascending. A gap in the hour sequence (e.g. an hour
/// dropped for missing data) ends a run just like a low score does.
pub fn extract_windows(hours: &[ScoredHour], threshold: u32) -> Vec<Window> {
    let mut blocks = Vec::new();
    let mut current: Vec<&ScoredHour> = Vec::new();

    for hour in hours {
        let qualifies = hour.score >= threshold;
        let continues = current
            .last()
            .is_some_and(|prev| hour.hour() == prev.hour() + 1);

        if qualifies && (current.is_empty() || continues) {
            current.push(hour);
            continue;
        }

        // Run broken — emit it if long enough, maybe start a new one
        close_run(&mut current, &mut blocks);
        if qualifies {
            current.push(hour);
        }
    }

    // Don't forget the last run
    close_run(&mut current, &mut blocks);

    rank_windows(blocks)
}

fn close_run(current: &mut Vec<&ScoredHour>, blocks: &mut Vec<Window>) {
    if current.len() >= MIN_WINDOW_HOURS {
        blocks.push(window_from_run(current));
    }
    current.clear();
}

fn window_from_run(run: &[&ScoredHour]) -> Window {
    let start_hour = run[0].hour();
    let length_hours = run.len() as u32;
    let total: u32 = run.iter().map(|h| h.score).sum();

    Window {
        start_hour,
        end_hour: start_hour + length_hours,
        average_score: total as f64 / run.len() as f64,
        length_hours,
    }
}

/// Sort by average descending, then length descending, keep the top three.
/// The sort is stable, so fully tied windows stay in time order.
fn rank_windows(mut blocks: Vec<Window>) -> Vec<Window> {
    blocks.sort_by(|a, b| {
        b.average_score
            .partial_cmp(&a.average_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.length_hours.cmp(&a.length_hours))
    });
    blocks.truncate(MAX_WINDOWS);
    blocks
}
