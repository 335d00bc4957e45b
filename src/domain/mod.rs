pub mod buckets;
pub mod location;
pub mod matrix;
pub mod models;
mod progress;
pub mod registry;

pub use buckets::{BucketError, BucketIndex, RatingBucket};
pub use location::{LocationNormalizer, OTHER_LOCATION};
pub use matrix::{CellKey, DropReason, OutcomeCell, OutcomeMatrix, RecordOutcome};
pub use models::*;
pub use progress::CrawlProgress;
pub use registry::{Enrichment, PlayerRegistry, ProfileLookup};
