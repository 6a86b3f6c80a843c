/// Cutoff used when a day has no scored hours at all.
pub const DEFAULT_THRESHOLD: u32 = 70;

/// Lowest cutoff a day can get — below this the whole day would qualify.
pub const MIN_THRESHOLD: u32 = 55;

/// Highest cutoff a day can get — above this nothing would.
pub const MAX_THRESHOLD: u32 = 85;

const PERCENTILE: f64 = 0.70;

/// Pick a day's qualifying cutoff: nearest-rank 70th percentile of its hourly
/// scores, clamped to [55, 85].
pub fn select_threshold(scores: &[u32]) -> u32 {
    if scores.is_empty() {
        return DEFAULT_THRESHOLD;
    }

    let mut sorted = scores.to_vec();
    sorted.sort_unstable();

    let idx = ((PERCENTILE * sorted.len() as f64).floor() as usize).min(sorted.len() - 1);
    sorted[idx].clamp(MIN_THRESHOLD, MAX_THRESHOLD)
}
