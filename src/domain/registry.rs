use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::location::LocationNormalizer;
use super::models::{PlayerId, PlayerRecord, PlayerRow};
use crate::errors::CrawlError;

/// Result of an on-demand profile lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    Found(PlayerRow),
    /// The profile's external id did not resolve to a listing row
    Unresolved { external_id: String },
}

/// Source of profile data for players missing from the listing pass
#[allow(async_fn_in_trait)]
pub trait ProfileLookup {
    async fn lookup_profile(&mut self, id: PlayerId) -> Result<Enrichment, CrawlError>;
}

/// Player id -> record map, populated from listing pages and optionally
/// from profile lookups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerRegistry {
    records: HashMap<PlayerId, PlayerRecord>,
    missing_external_ids: HashSet<String>,
    unresolved_players: HashSet<PlayerId>,
    #[serde(skip)]
    eager_enrichment: bool,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enrichment(mut self, enabled: bool) -> Self {
        self.eager_enrichment = enabled;
        self
    }

    pub fn set_enrichment(&mut self, enabled: bool) {
        self.eager_enrichment = enabled;
    }

    pub fn get(&self, id: PlayerId) -> Option<&PlayerRecord> {
        self.records.get(&id)
    }

    pub fn put(&mut self, id: PlayerId, record: PlayerRecord) {
        self.records.insert(id, record);
    }

    /// Normalize a listing row and store it under its own id
    pub fn register_row(&mut self, row: &PlayerRow, normalizer: &LocationNormalizer) -> &PlayerRecord {
        let record = PlayerRecord {
            id: row.id,
            location: normalizer.normalize(&row.raw_location),
            rating: row.rating,
        };
        self.records.entry(row.id).insert_entry(record).into_mut()
    }

    /// Look the player up, enriching from its profile when unknown and
    /// enrichment is enabled.
    ///
    /// Returns `Ok(None)` for players that stay unknown; callers drop the
    /// outcome in that case. Ids whose lookup failed or whose external id
    /// did not resolve are remembered and never looked up again. Only
    /// transient errors are returned.
    pub async fn ensure<L: ProfileLookup>(
        &mut self,
        id: PlayerId,
        lookup: &mut L,
        normalizer: &LocationNormalizer,
    ) -> Result<Option<&PlayerRecord>, CrawlError> {
        if self.records.contains_key(&id) {
            return Ok(self.records.get(&id));
        }
        if !self.eager_enrichment || self.unresolved_players.contains(&id) {
            return Ok(None);
        }

        let enrichment = match lookup.lookup_profile(id).await {
            Ok(enrichment) => enrichment,
            Err(err) if err.is_transient() => return Err(err),
            Err(err) => {
                self.unresolved_players.insert(id);
                warn!("Profile lookup for player {} failed: {}", id, err);
                return Ok(None);
            }
        };

        match enrichment {
            Enrichment::Found(row) => {
                let record = PlayerRecord {
                    id,
                    location: normalizer.normalize(&row.raw_location),
                    rating: row.rating,
                };
                info!("Added player {} to registry ({}, {})", id, record.location, record.rating);
                let stored = self.records.entry(id).insert_entry(record).into_mut();
                Ok(Some(&*stored))
            }
            Enrichment::Unresolved { external_id } => {
                self.unresolved_players.insert(id);
                if self.missing_external_ids.insert(external_id.clone()) {
                    warn!("External id {} of player {} does not resolve", external_id, id);
                } else {
                    debug!("External id {} already known to be missing", external_id);
                }
                Ok(None)
            }
        }
    }

    pub fn is_known_missing(&self, external_id: &str) -> bool {
        self.missing_external_ids.contains(external_id)
    }

    pub fn missing_count(&self) -> usize {
        self.missing_external_ids.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.records.values()
    }
}
