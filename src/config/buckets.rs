use crate::domain::models::Rating;

/// Rating bucket definition for statistics segmentation
///
/// Buckets are half-open `[low, high)` and must form an ordered,
/// non-overlapping partition. The labels are what the report shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSpec {
    pub low: Rating,
    pub high: Rating,
    pub label: &'static str,
}

impl BucketSpec {
    pub fn new(low: Rating, high: Rating, label: &'static str) -> Self {
        Self { low, high, label }
    }
}

/// Get the default partition: 250-point tiers with an open-ended top tier
pub fn get_buckets() -> Vec<BucketSpec> {
    vec![
        BucketSpec::new(0, 250, "0:250"),
        BucketSpec::new(250, 500, "251:500"),
        BucketSpec::new(500, 750, "501:750"),
        BucketSpec::new(750, 1000, "751:1000"),
        BucketSpec::new(1000, 1250, "1001:1250"),
        BucketSpec::new(1250, 1500, "1251:1500"),
        BucketSpec::new(1500, 1750, "1501:1750"),
        BucketSpec::new(1750, 2000, "1751:2000"),
        BucketSpec::new(2000, 2250, "2001:2250"),
        BucketSpec::new(2250, 2500, "2251:2500"),
        BucketSpec::new(2500, 4000, "2501+"),
    ]
}
