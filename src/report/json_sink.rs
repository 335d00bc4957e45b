use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ReportSink, ordered_locations};
use crate::domain::models::Rating;
use crate::stats::{AggregatedStatistics, LocationStatistics};

#[derive(Serialize)]
struct ReportDocument<'a> {
    generated_at: DateTime<Utc>,
    buckets: Vec<BucketReport<'a>>,
}

#[derive(Serialize)]
struct BucketReport<'a> {
    bucket: &'a str,
    low: Rating,
    high: Rating,
    locations: Vec<LocationReport<'a>>,
}

#[derive(Serialize)]
struct LocationReport<'a> {
    location: &'a str,
    #[serde(flatten)]
    stats: &'a LocationStatistics,
}

/// Pretty-printed JSON document, buckets in rating order
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn render(&mut self, stats: &AggregatedStatistics) -> Result<()> {
        let buckets = stats
            .iter()
            .map(|(bucket, locations)| BucketReport {
                bucket: &bucket.label,
                low: bucket.low,
                high: bucket.high,
                locations: ordered_locations(locations)
                    .into_iter()
                    .map(|(location, stats)| LocationReport { location, stats })
                    .collect(),
            })
            .collect();

        let document = ReportDocument {
            generated_at: Utc::now(),
            buckets,
        };

        serde_json::to_writer_pretty(&mut self.writer, &document).context("Failed to write JSON report")?;
        self.writer.flush().context("Failed to flush JSON report")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OutcomeMatrix, RatingBucket};
    use crate::stats::aggregate;
    use serde_json::Value;

    fn bucket(low: i32, high: i32, label: &str) -> RatingBucket {
        RatingBucket {
            low,
            high,
            label: label.to_string(),
        }
    }

    #[test]
    fn document_lists_buckets_and_flattened_statistics() {
        let low = bucket(0, 1000, "low");
        let high = bucket(1000, 4000, "high");
        let mut matrix = OutcomeMatrix::new();
        matrix.seed(&low, "OTHER");
        matrix.record_outcome(&high, &low, "NY", "CA", 1100, 900);

        let mut sink = JsonSink::new(Vec::new());
        sink.render(&aggregate(&matrix)).unwrap();
        let json: Value = serde_json::from_slice(&sink.into_inner()).unwrap();

        assert!(json["generated_at"].is_string());
        let buckets = json["buckets"].as_array().unwrap();
        assert_eq!(buckets[0]["bucket"], "low");
        assert_eq!(buckets[1]["bucket"], "high");

        let low_locations = buckets[0]["locations"].as_array().unwrap();
        assert_eq!(low_locations[0]["location"], "CA");
        assert_eq!(low_locations[0]["num_losses"], 1);
        assert_eq!(low_locations[0]["win_ratio"], 0.0);
        assert_eq!(low_locations[0]["opponents"]["NY"]["avg_loss_rating_diff"], 200.0);
        assert_eq!(low_locations[1]["location"], "OTHER");
        assert!(low_locations[1]["win_ratio"].is_null());

        assert_eq!(buckets[1]["locations"][0]["avg_win_rating_diff"], -200.0);
    }
}
