pub mod aggregator;
pub mod summary;
pub mod types;

pub use aggregator::aggregate;
pub use types::{AggregatedStatistics, LocationMap, LocationStatistics, StateStatistics};
