use std::io::Write;

use anyhow::{Context, Result};
use csv::Writer;

use super::{ReportSink, ordered_locations};
use crate::stats::{AggregatedStatistics, LocationStatistics, StateStatistics};

const TOTAL_ROW: &str = "ALL";
const NO_DATA: &str = "N/A";

const HEADERS: [&str; 10] = [
    "bucket",
    "location",
    "opponent",
    "num_wins",
    "num_losses",
    "win_ratio",
    "avg_win_rating_diff",
    "median_win_rating_diff",
    "avg_loss_rating_diff",
    "median_loss_rating_diff",
];

/// Flat table: one location total row followed by one row per opponent
pub struct CsvSink<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Writer::from_writer(writer),
        }
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV report: {}", e.error()))
    }

    fn write_location(&mut self, bucket: &str, location: &str, stats: &LocationStatistics) -> Result<()> {
        self.writer.write_record([
            bucket.to_string(),
            location.to_string(),
            TOTAL_ROW.to_string(),
            stats.num_wins.to_string(),
            stats.num_losses.to_string(),
            decimal(stats.win_ratio),
            decimal(stats.avg_win_rating_diff),
            decimal(stats.median_win_rating_diff),
            decimal(stats.avg_loss_rating_diff),
            decimal(stats.median_loss_rating_diff),
        ])?;

        for (opponent, versus) in &stats.opponents {
            self.write_opponent(bucket, location, opponent, versus)?;
        }
        Ok(())
    }

    fn write_opponent(
        &mut self,
        bucket: &str,
        location: &str,
        opponent: &str,
        stats: &StateStatistics,
    ) -> Result<()> {
        self.writer.write_record([
            bucket.to_string(),
            location.to_string(),
            opponent.to_string(),
            count(stats.num_wins),
            count(stats.num_losses),
            decimal(stats.win_ratio),
            decimal(stats.avg_win_rating_diff),
            decimal(stats.median_win_rating_diff),
            decimal(stats.avg_loss_rating_diff),
            decimal(stats.median_loss_rating_diff),
        ])?;
        Ok(())
    }
}

impl<W: Write> ReportSink for CsvSink<W> {
    fn render(&mut self, stats: &AggregatedStatistics) -> Result<()> {
        self.writer.write_record(HEADERS)?;

        for (bucket, locations) in stats.iter() {
            for (location, location_stats) in ordered_locations(locations) {
                self.write_location(&bucket.label, location, location_stats)?;
            }
        }

        self.writer.flush().context("Failed to flush CSV report")?;
        Ok(())
    }
}

fn decimal(value: Option<f64>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), |v| format!("{:.2}", v))
}

fn count(value: Option<usize>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OutcomeMatrix, RatingBucket};
    use crate::stats::aggregate;

    #[test]
    fn rows_cover_totals_and_opponents() {
        let low = RatingBucket {
            low: 0,
            high: 1000,
            label: "low".to_string(),
        };
        let mut matrix = OutcomeMatrix::new();
        matrix.record_outcome(&low, &low, "CA", "NY", 950, 900);

        let mut sink = CsvSink::new(Vec::new());
        sink.render(&aggregate(&matrix)).unwrap();
        let output = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], HEADERS.join(","));
        assert_eq!(lines[1], "low,CA,ALL,1,0,1.00,-50.00,-50.00,N/A,N/A");
        assert_eq!(lines[2], "low,CA,NY,1,N/A,1.00,-50.00,-50.00,N/A,N/A");
        assert_eq!(lines[3], "low,NY,ALL,0,1,0.00,N/A,N/A,50.00,50.00");
        assert_eq!(lines[4], "low,NY,CA,N/A,1,0.00,N/A,N/A,50.00,50.00");
        assert_eq!(lines.len(), 5);
    }
}
