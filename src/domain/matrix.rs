use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::buckets::{BucketIndex, RatingBucket};
use super::models::{PlayerRecord, Rating, RatingDiff};

/// Composite key of one matrix cell
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub bucket: RatingBucket,
    pub location: String,
}

/// Rating differentials of one (bucket, location), keyed by opponent location.
///
/// Wins store `loser - winner` and losses store `winner - loser`, so a
/// positive loss is a loss to a stronger player and a positive win is an
/// upset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCell {
    pub wins: BTreeMap<String, Vec<RatingDiff>>,
    pub losses: BTreeMap<String, Vec<RatingDiff>>,
}

impl OutcomeCell {
    pub fn win_count(&self) -> usize {
        self.wins.values().map(Vec::len).sum()
    }

    pub fn loss_count(&self) -> usize {
        self.losses.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    WinnerOutOfRange { rating: Rating },
    LoserOutOfRange { rating: Rating },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded,
    Dropped(DropReason),
}

/// Win/loss rating differentials per (bucket, location) and opponent location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(CellKey, OutcomeCell)>", into = "Vec<(CellKey, OutcomeCell)>")]
pub struct OutcomeMatrix {
    cells: BTreeMap<CellKey, OutcomeCell>,
}

impl OutcomeMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the cell for a (bucket, location); never overwrites
    pub fn seed(&mut self, bucket: &RatingBucket, location: &str) -> &mut OutcomeCell {
        let key = CellKey {
            bucket: bucket.clone(),
            location: location.to_string(),
        };
        self.cells.entry(key).or_default()
    }

    /// Append one match to the winner's wins and the loser's losses.
    pub fn record_outcome(
        &mut self,
        winner_bucket: &RatingBucket,
        loser_bucket: &RatingBucket,
        winner_location: &str,
        loser_location: &str,
        winner_rating: Rating,
        loser_rating: Rating,
    ) {
        self.seed(loser_bucket, loser_location)
            .losses
            .entry(winner_location.to_string())
            .or_default()
            .push(winner_rating - loser_rating);

        self.seed(winner_bucket, winner_location)
            .wins
            .entry(loser_location.to_string())
            .or_default()
            .push(loser_rating - winner_rating);
    }

    /// Record a match between two registered players, dropping it when
    /// either rating falls outside the bucket partition.
    pub fn record_match(
        &mut self,
        winner: &PlayerRecord,
        loser: &PlayerRecord,
        buckets: &BucketIndex,
    ) -> RecordOutcome {
        let Some(winner_bucket) = buckets.bucket_for(winner.rating) else {
            return RecordOutcome::Dropped(DropReason::WinnerOutOfRange {
                rating: winner.rating,
            });
        };
        let Some(loser_bucket) = buckets.bucket_for(loser.rating) else {
            return RecordOutcome::Dropped(DropReason::LoserOutOfRange {
                rating: loser.rating,
            });
        };

        self.record_outcome(
            winner_bucket,
            loser_bucket,
            &winner.location,
            &loser.location,
            winner.rating,
            loser.rating,
        );
        RecordOutcome::Recorded
    }

    pub fn cell(&self, bucket_label: &str, location: &str) -> Option<&OutcomeCell> {
        self.cells
            .iter()
            .find(|(key, _)| key.bucket.label == bucket_label && key.location == location)
            .map(|(_, cell)| cell)
    }

    pub fn cells(&self) -> impl Iterator<Item = (&CellKey, &OutcomeCell)> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl From<Vec<(CellKey, OutcomeCell)>> for OutcomeMatrix {
    fn from(entries: Vec<(CellKey, OutcomeCell)>) -> Self {
        Self {
            cells: entries.into_iter().collect(),
        }
    }
}

impl From<OutcomeMatrix> for Vec<(CellKey, OutcomeCell)> {
    fn from(matrix: OutcomeMatrix) -> Self {
        matrix.cells.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::buckets::BucketSpec;

    fn buckets() -> BucketIndex {
        BucketIndex::new(&[
            BucketSpec::new(0, 1000, "low"),
            BucketSpec::new(1000, 2000, "mid"),
            BucketSpec::new(2000, 4000, "high"),
        ])
        .unwrap()
    }

    fn player(id: i64, location: &str, rating: Rating) -> PlayerRecord {
        PlayerRecord {
            id,
            location: location.to_string(),
            rating,
        }
    }

    /// Cell contents with every differential list sorted
    fn as_multisets(matrix: &OutcomeMatrix) -> Vec<(CellKey, OutcomeCell)> {
        matrix
            .cells()
            .map(|(key, cell)| {
                let mut cell = cell.clone();
                cell.wins.values_mut().for_each(|v| v.sort_unstable());
                cell.losses.values_mut().for_each(|v| v.sort_unstable());
                (key.clone(), cell)
            })
            .collect()
    }

    #[test]
    fn sign_convention_is_asymmetric() {
        let index = buckets();
        let mut matrix = OutcomeMatrix::new();
        let winner = player(1, "NY", 1600);
        let loser = player(2, "CA", 1400);

        assert_eq!(matrix.record_match(&winner, &loser, &index), RecordOutcome::Recorded);

        let loser_cell = matrix.cell("mid", "CA").unwrap();
        assert_eq!(loser_cell.losses["NY"], vec![200]);
        assert!(loser_cell.wins.is_empty());

        let winner_cell = matrix.cell("mid", "NY").unwrap();
        assert_eq!(winner_cell.wins["CA"], vec![-200]);
        assert!(winner_cell.losses.is_empty());
    }

    #[test]
    fn repeated_matches_are_all_kept() {
        let index = buckets();
        let mut matrix = OutcomeMatrix::new();
        let winner = player(1, "NY", 1100);
        let loser = player(2, "NY", 1050);

        matrix.record_match(&winner, &loser, &index);
        matrix.record_match(&winner, &loser, &index);

        let cell = matrix.cell("mid", "NY").unwrap();
        assert_eq!(cell.wins["NY"], vec![-50, -50]);
        assert_eq!(cell.losses["NY"], vec![50, 50]);
    }

    #[test]
    fn out_of_range_rating_drops_the_match() {
        let index = buckets();
        let mut matrix = OutcomeMatrix::new();

        let outcome = matrix.record_match(&player(1, "NY", 5000), &player(2, "CA", 900), &index);
        assert_eq!(
            outcome,
            RecordOutcome::Dropped(DropReason::WinnerOutOfRange { rating: 5000 })
        );
        let outcome = matrix.record_match(&player(1, "NY", 900), &player(2, "CA", -3), &index);
        assert_eq!(
            outcome,
            RecordOutcome::Dropped(DropReason::LoserOutOfRange { rating: -3 })
        );
        assert!(matrix.is_empty());
    }

    #[test]
    fn seeding_never_overwrites() {
        let index = buckets();
        let low = index.bucket_for(500).unwrap().clone();
        let mut matrix = OutcomeMatrix::new();

        matrix.record_match(&player(1, "CA", 900), &player(2, "CA", 800), &index);
        matrix.seed(&low, "CA");
        matrix.seed(&low, "TX");

        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.cell("low", "CA").unwrap().win_count(), 1);
        assert_eq!(matrix.cell("low", "TX").unwrap(), &OutcomeCell::default());
    }

    #[test]
    fn replay_order_does_not_change_the_multisets() {
        let index = buckets();
        let matches = vec![
            (player(1, "NY", 1600), player(2, "CA", 1400)),
            (player(3, "CA", 1450), player(1, "NY", 1600)),
            (player(2, "CA", 1400), player(4, "TX", 2100)),
            (player(4, "TX", 2100), player(3, "CA", 1450)),
            (player(1, "NY", 1600), player(3, "CA", 1450)),
        ];

        let mut forward = OutcomeMatrix::new();
        for (w, l) in &matches {
            forward.record_match(w, l, &index);
        }
        let mut backward = OutcomeMatrix::new();
        for (w, l) in matches.iter().rev() {
            backward.record_match(w, l, &index);
        }
        let mut rotated = OutcomeMatrix::new();
        for (w, l) in matches.iter().cycle().skip(2).take(matches.len()) {
            rotated.record_match(w, l, &index);
        }

        assert_eq!(as_multisets(&forward), as_multisets(&backward));
        assert_eq!(as_multisets(&forward), as_multisets(&rotated));
    }

    #[test]
    fn serializes_as_entry_list() {
        let index = buckets();
        let mut matrix = OutcomeMatrix::new();
        matrix.record_match(&player(1, "NY", 1600), &player(2, "CA", 1400), &index);

        let json = serde_json::to_value(&matrix).unwrap();
        assert!(json.is_array());
        let restored: OutcomeMatrix = serde_json::from_value(json).unwrap();
        assert_eq!(restored, matrix);
    }
}
