use serde::{Deserialize, Serialize};

pub type PlayerId = i64;
pub type TournamentId = i64;
pub type Rating = i32;
pub type RatingDiff = i32;

/// Player as stored in the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub location: String,
    pub rating: Rating,
}

// --- Extracted page structures ---

/// One row of the player listing (or of an external-id search result)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRow {
    pub id: PlayerId,
    pub raw_location: String,
    pub rating: Rating,
}

/// Winner/loser pair read from a match results page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPairing {
    pub winner_id: PlayerId,
    pub loser_id: PlayerId,
}

/// Everything read from one match results page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchPage {
    pub pairings: Vec<MatchPairing>,
    /// Pairs whose cells carried no player reference
    pub skipped_cells: usize,
    /// Offset of the last page of this tournament, when the page shows a pager
    pub last_offset: Option<usize>,
}
