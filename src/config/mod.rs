pub mod buckets;
pub mod settings;

pub use buckets::{BucketSpec, get_buckets};
pub use settings::{AppConfig, CrawlSettings, ReportFormat, ReportSettings, ScraperSettings};
