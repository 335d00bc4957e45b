use crate::domain::models::RatingDiff;

pub fn mean(values: &[RatingDiff]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: i64 = values.iter().map(|&v| i64::from(v)).sum();
    Some(sum as f64 / values.len() as f64)
}

pub fn median(values: &[RatingDiff]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0)
    } else {
        Some(f64::from(sorted[mid]))
    }
}

/// `wins / (wins + losses)`; no data when nothing was played.
pub fn win_ratio(wins: usize, losses: usize) -> Option<f64> {
    let played = wins + losses;
    (played > 0).then(|| wins as f64 / played as f64)
}
