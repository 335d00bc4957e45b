use anyhow::Result;
use log::{info, warn};

use crate::domain::OutcomeMatrix;
use crate::report::ReportSink;
use crate::stats::aggregate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    Rendered { buckets: usize },
    /// Aggregation came out empty; the sink was never opened
    NothingToRender,
}

/// Aggregate the matrix and hand the statistics to the sink.
///
/// The sink is opened lazily so an empty result leaves no output behind.
pub fn render_report<K, F>(matrix: &OutcomeMatrix, open_sink: F) -> Result<ReportOutcome>
where
    K: ReportSink,
    F: FnOnce() -> Result<K>,
{
    info!("Step 3: Aggregating statistics...");
    let stats = aggregate(matrix);

    if stats.is_empty() {
        warn!("No outcomes to report, skipping render");
        return Ok(ReportOutcome::NothingToRender);
    }

    let mut sink = open_sink()?;
    sink.render(&stats)?;
    info!("  → Rendered {} rating buckets", stats.len());
    Ok(ReportOutcome::Rendered { buckets: stats.len() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RatingBucket;
    use crate::stats::AggregatedStatistics;

    #[derive(Default)]
    struct RecordingSink {
        rendered: Vec<AggregatedStatistics>,
    }

    impl ReportSink for &mut RecordingSink {
        fn render(&mut self, stats: &AggregatedStatistics) -> Result<()> {
            self.rendered.push(stats.clone());
            Ok(())
        }
    }

    struct UnreachableSink;

    impl ReportSink for UnreachableSink {
        fn render(&mut self, _stats: &AggregatedStatistics) -> Result<()> {
            unreachable!("rendered an empty report")
        }
    }

    #[test]
    fn empty_matrix_never_opens_the_sink() {
        let mut opened = false;
        let outcome = render_report(&OutcomeMatrix::new(), || {
            opened = true;
            Ok(UnreachableSink)
        })
        .unwrap();
        assert!(!opened);
        assert_eq!(outcome, ReportOutcome::NothingToRender);
    }

    #[test]
    fn seeded_cells_are_rendered() {
        let mut matrix = OutcomeMatrix::new();
        let bucket = RatingBucket {
            low: 0,
            high: 250,
            label: "0:250".to_string(),
        };
        matrix.seed(&bucket, "CA");

        let mut sink = RecordingSink::default();
        let outcome = render_report(&matrix, || Ok(&mut sink)).unwrap();

        assert_eq!(outcome, ReportOutcome::Rendered { buckets: 1 });
        assert_eq!(sink.rendered.len(), 1);
        let stats = sink.rendered[0].location("0:250", "CA").unwrap();
        assert_eq!(stats.win_ratio, None);
    }
}
