use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::RatingBucket;

/// Statistics of one location within a rating bucket.
///
/// `None` means no data: the sample the statistic is computed over is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationStatistics {
    pub num_wins: usize,
    pub num_losses: usize,
    pub win_ratio: Option<f64>,
    pub avg_win_rating_diff: Option<f64>,
    pub median_win_rating_diff: Option<f64>,
    pub avg_loss_rating_diff: Option<f64>,
    pub median_loss_rating_diff: Option<f64>,
    pub opponents: BTreeMap<String, StateStatistics>,
}

/// Statistics of one location against a single opponent location.
///
/// Win-side fields are `None` when there were no wins against that
/// opponent, loss-side fields likewise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateStatistics {
    pub num_wins: Option<usize>,
    pub num_losses: Option<usize>,
    pub win_ratio: Option<f64>,
    pub avg_win_rating_diff: Option<f64>,
    pub median_win_rating_diff: Option<f64>,
    pub avg_loss_rating_diff: Option<f64>,
    pub median_loss_rating_diff: Option<f64>,
}

pub type LocationMap = BTreeMap<String, LocationStatistics>;

/// Aggregation result: bucket -> location -> statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedStatistics {
    buckets: BTreeMap<RatingBucket, LocationMap>,
}

impl AggregatedStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, bucket: RatingBucket, location: String, stats: LocationStatistics) {
        self.buckets.entry(bucket).or_default().insert(location, stats);
    }

    pub fn bucket(&self, label: &str) -> Option<&LocationMap> {
        self.buckets
            .iter()
            .find(|(bucket, _)| bucket.label == label)
            .map(|(_, locations)| locations)
    }

    pub fn location(&self, label: &str, location: &str) -> Option<&LocationStatistics> {
        self.bucket(label)?.get(location)
    }

    /// Buckets in ascending rating order
    pub fn iter(&self) -> impl Iterator<Item = (&RatingBucket, &LocationMap)> {
        self.buckets.iter()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
