use anyhow::{Context, Result, bail};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::api::DirectoryClient;
use crate::cache::Cache;
use crate::config::settings::{AppConfig, CrawlSettings};
use crate::domain::{
    BucketIndex, CrawlProgress, LocationNormalizer, MatchPairing, OutcomeMatrix, PlayerRegistry,
    RecordOutcome, TournamentId,
};
use crate::errors::{CrawlError, pass_context};
use crate::http::{PageSource, RateLimitedClient};
use crate::pagination::{OffsetCursor, PaginationConfig};

/// Registry and seeded matrix produced by the player listing pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerPass {
    pub registry: PlayerRegistry,
    pub matrix: OutcomeMatrix,
}

/// Counters of the match pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCounters {
    pub tournaments: usize,
    pub matches_read: usize,
    pub outcomes_recorded: usize,
    /// Either player missing from the registry
    pub unknown_players: usize,
    /// Either rating outside the bucket partition
    pub out_of_range: usize,
    pub skipped_cells: usize,
}

impl MatchCounters {
    pub fn outcomes_dropped(&self) -> usize {
        self.unknown_players + self.out_of_range
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchPass {
    pub matrix: OutcomeMatrix,
    pub counters: MatchCounters,
}

pub struct CrawlService<S = RateLimitedClient> {
    settings: CrawlSettings,
    client: DirectoryClient<S>,
    buckets: BucketIndex,
    normalizer: LocationNormalizer,
}

impl CrawlService<RateLimitedClient> {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = DirectoryClient::new(&config.scraper)?;
        let normalizer = LocationNormalizer::load(&config.cities_path)?;
        Self::with_client(config, client, normalizer)
    }
}

impl<S: PageSource> CrawlService<S> {
    pub fn with_client(
        config: &AppConfig,
        client: DirectoryClient<S>,
        normalizer: LocationNormalizer,
    ) -> Result<Self> {
        let buckets = BucketIndex::new(&config.buckets).context("Invalid rating bucket partition")?;
        Ok(Self {
            settings: config.crawl.clone(),
            client,
            buckets,
            normalizer,
        })
    }

    /// Both passes, reusing memoized passes unless `refresh` is set
    pub async fn run(&mut self, cache: &Cache, refresh: bool) -> Result<MatchPass> {
        info!("=== Starting Crawl ===\n");
        let mode = self.settings.mode_key();
        let match_key = Cache::pass_key("match", &mode);

        if !refresh {
            if let Some(pass) = cache.load_pass::<MatchPass>(&match_key)? {
                info!("  → Reusing cached match pass ({} matches)", pass.counters.matches_read);
                return Ok(pass);
            }
        }

        let player_key = Cache::pass_key("player", &mode);
        let cached_players = if refresh {
            None
        } else {
            cache.load_pass::<PlayerPass>(&player_key)?
        };
        let players = match cached_players {
            Some(pass) => {
                info!("  → Reusing cached player pass ({} players)", pass.registry.len());
                pass
            }
            None => {
                let pass = self
                    .run_player_pass()
                    .await
                    .with_context(|| pass_context("Player"))?;
                cache.save_pass(&player_key, &pass)?;
                pass
            }
        };

        let matches = self
            .run_match_pass(players)
            .await
            .with_context(|| pass_context("Match"))?;
        cache.save_pass(&match_key, &matches)?;

        info!("=== Crawl Complete ===");
        Ok(matches)
    }

    /// Walk the player listing, registering every row and seeding its cell
    pub async fn run_player_pass(&mut self) -> Result<PlayerPass, CrawlError> {
        info!("Step 1: Crawling player listing...");

        let total = self.player_total().await?;
        let page_size = PaginationConfig::new(self.settings.player_page_cap)
            .page_size(self.settings.player_page_cap, Some(total));
        info!("  → {} players, {} per page", total, page_size);

        let mut registry = PlayerRegistry::new().with_enrichment(self.settings.eager_enrichment);
        let mut matrix = OutcomeMatrix::new();
        let mut cursor = OffsetCursor::bounded(0, page_size, total);
        let mut progress = CrawlProgress::new("players", total, self.settings.player_progress_every);

        while let Some(page) = self
            .client
            .next_player_page(&mut cursor, self.settings.citizens_only)
            .await?
        {
            for row in &page.items {
                let record = registry.register_row(row, &self.normalizer);
                match self.buckets.bucket_for(record.rating) {
                    Some(bucket) => {
                        matrix.seed(bucket, &record.location);
                    }
                    None => debug!("Player {} rated {} is outside every bucket", record.id, record.rating),
                }
            }
            progress.advance(page.items.len());
        }

        progress.finish();
        info!("  → Registered {} players into {} cells\n", registry.len(), matrix.len());
        Ok(PlayerPass { registry, matrix })
    }

    /// Walk every tournament's results and record each outcome
    pub async fn run_match_pass(&mut self, players: PlayerPass) -> Result<MatchPass, CrawlError> {
        info!("Step 2: Crawling tournament results...");

        let PlayerPass {
            mut registry,
            mut matrix,
        } = players;
        registry.set_enrichment(self.settings.eager_enrichment);

        let total = self.tournament_total().await?;
        let page_size = PaginationConfig::new(self.settings.tournament_page_cap)
            .page_size(self.settings.tournament_page_cap, Some(total));
        let tournament_ids = self.client.fetch_tournament_ids(total, page_size).await?;

        let mut counters = MatchCounters::default();
        let mut progress = CrawlProgress::new(
            "tournaments",
            tournament_ids.len(),
            self.settings.tournament_progress_every,
        );

        for tournament_id in tournament_ids {
            self.crawl_tournament(tournament_id, &mut registry, &mut matrix, &mut counters)
                .await?;
            counters.tournaments += 1;
            progress.advance(1);
        }

        progress.finish();
        info!(
            "  → Read {} matches: {} recorded, {} dropped ({} unknown players, {} out of range)",
            counters.matches_read,
            counters.outcomes_recorded,
            counters.outcomes_dropped(),
            counters.unknown_players,
            counters.out_of_range
        );
        if registry.missing_count() > 0 {
            info!("  → {} external ids did not resolve", registry.missing_count());
        }

        Ok(MatchPass { matrix, counters })
    }

    async fn crawl_tournament(
        &mut self,
        tournament_id: TournamentId,
        registry: &mut PlayerRegistry,
        matrix: &mut OutcomeMatrix,
        counters: &mut MatchCounters,
    ) -> Result<(), CrawlError> {
        let mut cursor = OffsetCursor::discovering(self.settings.match_page_size);

        while let Some(page) = self.client.next_match_page(tournament_id, &mut cursor).await? {
            if !cursor.has_bound() {
                // The last page offset itself must still be fetched
                cursor.discover_bound(page.items.last_offset.unwrap_or(0) + 1);
            }

            counters.skipped_cells += page.items.skipped_cells;
            for pairing in &page.items.pairings {
                counters.matches_read += 1;
                self.record_pairing(*pairing, registry, matrix, counters).await?;
            }
        }

        debug!("Tournament {} done after {} pages", tournament_id, cursor.pages_fetched());
        Ok(())
    }

    async fn record_pairing(
        &mut self,
        pairing: MatchPairing,
        registry: &mut PlayerRegistry,
        matrix: &mut OutcomeMatrix,
        counters: &mut MatchCounters,
    ) -> Result<(), CrawlError> {
        let winner = registry
            .ensure(pairing.winner_id, &mut self.client, &self.normalizer)
            .await?
            .cloned();
        let loser = match winner {
            Some(_) => registry
                .ensure(pairing.loser_id, &mut self.client, &self.normalizer)
                .await?
                .cloned(),
            None => None,
        };

        let (Some(winner), Some(loser)) = (winner, loser) else {
            debug!(
                "Dropping match {} over {}: player not registered",
                pairing.winner_id, pairing.loser_id
            );
            counters.unknown_players += 1;
            return Ok(());
        };

        match matrix.record_match(&winner, &loser, &self.buckets) {
            RecordOutcome::Recorded => counters.outcomes_recorded += 1,
            RecordOutcome::Dropped(reason) => {
                debug!("Dropping match {} over {}: {:?}", winner.id, loser.id, reason);
                counters.out_of_range += 1;
            }
        }
        Ok(())
    }

    async fn player_total(&mut self) -> Result<usize, CrawlError> {
        if self.settings.full_population {
            self.client.fetch_player_total(self.settings.citizens_only).await
        } else {
            Ok(self.settings.sample_players)
        }
    }

    async fn tournament_total(&mut self) -> Result<usize, CrawlError> {
        if self.settings.full_population {
            self.client.fetch_tournament_total().await
        } else {
            Ok(self.settings.sample_tournaments)
        }
    }

    pub fn client(&self) -> &DirectoryClient<S> {
        &self.client
    }
}

/// The memoized match pass for a crawl mode, for offline re-aggregation
pub fn load_match_pass(cache: &Cache, settings: &CrawlSettings) -> Result<MatchPass> {
    let key = Cache::pass_key("match", &settings.mode_key());
    match cache.load_pass(&key)? {
        Some(pass) => Ok(pass),
        None => bail!("No cached match pass '{}'; run the crawl command first", key),
    }
}
