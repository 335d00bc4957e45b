mod csv_sink;
mod json_sink;

use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};

use crate::config::settings::{ReportFormat, ReportSettings};
use crate::stats::{AggregatedStatistics, LocationMap, LocationStatistics};

pub use csv_sink::CsvSink;
pub use json_sink::JsonSink;

/// Destination of the aggregated statistics
pub trait ReportSink {
    fn render(&mut self, stats: &AggregatedStatistics) -> Result<()>;
}

impl<T: ReportSink + ?Sized> ReportSink for Box<T> {
    fn render(&mut self, stats: &AggregatedStatistics) -> Result<()> {
        (**self).render(stats)
    }
}

/// Open the file sink configured for this run
pub fn open_sink(settings: &ReportSettings) -> Result<Box<dyn ReportSink>> {
    let file = File::create(&settings.output)
        .with_context(|| format!("Failed to create report file {}", settings.output.display()))?;
    let writer = BufWriter::new(file);

    Ok(match settings.format {
        ReportFormat::Json => Box::new(JsonSink::new(writer)),
        ReportFormat::Csv => Box::new(CsvSink::new(writer)),
    })
}

/// Locations ordered by (name length, name), so state codes come first
fn ordered_locations(locations: &LocationMap) -> Vec<(&String, &LocationStatistics)> {
    let mut ordered: Vec<_> = locations.iter().collect();
    ordered.sort_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn empty_stats() -> LocationStatistics {
        LocationStatistics {
            num_wins: 0,
            num_losses: 0,
            win_ratio: None,
            avg_win_rating_diff: None,
            median_win_rating_diff: None,
            avg_loss_rating_diff: None,
            median_loss_rating_diff: None,
            opponents: BTreeMap::new(),
        }
    }

    #[test]
    fn short_locations_sort_first() {
        let mut locations = LocationMap::new();
        for name in ["OTHER", "TX", "Ontario", "CA"] {
            locations.insert(name.to_string(), empty_stats());
        }

        let names: Vec<&str> = ordered_locations(&locations)
            .into_iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, vec!["CA", "TX", "OTHER", "Ontario"]);
    }
}
