use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::Rating;
use crate::config::buckets::BucketSpec;

/// Half-open rating interval `[low, high)` with a display label.
///
/// Ordering follows the lower bound, so maps keyed by buckets iterate
/// from the lowest tier upwards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RatingBucket {
    pub low: Rating,
    pub high: Rating,
    pub label: String,
}

impl RatingBucket {
    pub fn contains(&self, rating: Rating) -> bool {
        self.low <= rating && rating < self.high
    }
}

impl fmt::Display for RatingBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum BucketError {
    #[error("bucket partition is empty")]
    Empty,

    #[error("bucket {label} has an empty range [{low}, {high})")]
    EmptyRange { label: String, low: Rating, high: Rating },

    #[error("bucket {second} overlaps bucket {first}")]
    Overlap { first: String, second: String },

    #[error("bucket label {0} is used twice")]
    DuplicateLabel(String),
}

/// Point lookup over a fixed bucket partition, keyed by lower bound.
#[derive(Debug, Clone)]
pub struct BucketIndex {
    by_low: BTreeMap<Rating, RatingBucket>,
}

impl BucketIndex {
    /// Build the index, rejecting empty, inverted or overlapping buckets.
    pub fn new(specs: &[BucketSpec]) -> Result<Self, BucketError> {
        if specs.is_empty() {
            return Err(BucketError::Empty);
        }

        let mut sorted: Vec<&BucketSpec> = specs.iter().collect();
        sorted.sort_by_key(|spec| spec.low);

        let mut by_low = BTreeMap::new();
        let mut previous: Option<&BucketSpec> = None;

        for spec in sorted {
            if spec.low >= spec.high {
                return Err(BucketError::EmptyRange {
                    label: spec.label.to_string(),
                    low: spec.low,
                    high: spec.high,
                });
            }
            if let Some(prev) = previous {
                if spec.low < prev.high {
                    return Err(BucketError::Overlap {
                        first: prev.label.to_string(),
                        second: spec.label.to_string(),
                    });
                }
            }
            if by_low.values().any(|b: &RatingBucket| b.label == spec.label) {
                return Err(BucketError::DuplicateLabel(spec.label.to_string()));
            }

            by_low.insert(spec.low, to_bucket(spec));
            previous = Some(spec);
        }

        Ok(Self { by_low })
    }

    /// Bucket containing `rating`, or `None` outside the configured domain
    pub fn bucket_for(&self, rating: Rating) -> Option<&RatingBucket> {
        let (_, candidate) = self.by_low.range(..=rating).next_back()?;
        candidate.contains(rating).then_some(candidate)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RatingBucket> {
        self.by_low.values()
    }

    pub fn len(&self) -> usize {
        self.by_low.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_low.is_empty()
    }
}

fn to_bucket(spec: &BucketSpec) -> RatingBucket {
    RatingBucket {
        low: spec.low,
        high: spec.high,
        label: spec.label.to_string(),
    }
}
