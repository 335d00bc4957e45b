use std::collections::{BTreeMap, BTreeSet};

use log::info;

use super::summary::{mean, median, win_ratio};
use super::types::{AggregatedStatistics, LocationStatistics, StateStatistics};
use crate::domain::matrix::{OutcomeCell, OutcomeMatrix};
use crate::domain::models::RatingDiff;

/// Reduce the outcome matrix into per-location and per-opponent statistics
pub fn aggregate(matrix: &OutcomeMatrix) -> AggregatedStatistics {
    info!("Aggregating statistics for {} matrix cells", matrix.len());

    let mut result = AggregatedStatistics::new();
    for (key, cell) in matrix.cells() {
        result.insert(key.bucket.clone(), key.location.clone(), summarize_cell(cell));
    }
    result
}

fn summarize_cell(cell: &OutcomeCell) -> LocationStatistics {
    let wins = flatten(&cell.wins);
    let losses = flatten(&cell.losses);

    LocationStatistics {
        num_wins: wins.len(),
        num_losses: losses.len(),
        win_ratio: win_ratio(wins.len(), losses.len()),
        avg_win_rating_diff: mean(&wins),
        median_win_rating_diff: median(&wins),
        avg_loss_rating_diff: mean(&losses),
        median_loss_rating_diff: median(&losses),
        opponents: summarize_opponents(cell),
    }
}

fn flatten(by_opponent: &BTreeMap<String, Vec<RatingDiff>>) -> Vec<RatingDiff> {
    by_opponent.values().flatten().copied().collect()
}

fn summarize_opponents(cell: &OutcomeCell) -> BTreeMap<String, StateStatistics> {
    let opponents: BTreeSet<&String> = cell.wins.keys().chain(cell.losses.keys()).collect();

    opponents
        .into_iter()
        .map(|opponent| {
            let wins = non_empty(cell.wins.get(opponent));
            let losses = non_empty(cell.losses.get(opponent));
            (opponent.clone(), summarize_opponent(wins, losses))
        })
        .collect()
}

fn non_empty(values: Option<&Vec<RatingDiff>>) -> Option<&[RatingDiff]> {
    values.map(Vec::as_slice).filter(|v| !v.is_empty())
}

fn summarize_opponent(wins: Option<&[RatingDiff]>, losses: Option<&[RatingDiff]>) -> StateStatistics {
    let win_count = wins.map_or(0, <[_]>::len);
    let loss_count = losses.map_or(0, <[_]>::len);

    StateStatistics {
        num_wins: wins.map(<[_]>::len),
        num_losses: losses.map(<[_]>::len),
        win_ratio: win_ratio(win_count, loss_count),
        avg_win_rating_diff: wins.and_then(mean),
        median_win_rating_diff: wins.and_then(median),
        avg_loss_rating_diff: losses.and_then(mean),
        median_loss_rating_diff: losses.and_then(median),
    }
}
