use std::time::Duration;

use anyhow::Result;
use log::{debug, info};

use crate::api::parsers::HtmlExtractor;
use crate::config::settings::ScraperSettings;
use crate::domain::models::{MatchPage, PlayerId, PlayerRow, TournamentId};
use crate::domain::registry::{Enrichment, ProfileLookup};
use crate::errors::CrawlError;
use crate::fetchers::{Page, PaginatedFetcher};
use crate::http::{PageSource, RateLimitedClient};
use crate::pagination::{OffsetCursor, urls};

/// Client for the player/tournament directory
pub struct DirectoryClient<S = RateLimitedClient> {
    fetcher: PaginatedFetcher<S>,
    extractor: HtmlExtractor,
    base_url: String,
}

impl DirectoryClient<RateLimitedClient> {
    /// Create a client talking to the live site
    pub fn new(settings: &ScraperSettings) -> Result<Self> {
        let client = RateLimitedClient::new(
            &settings.user_agent,
            settings.timeout_secs,
            settings.rate_limit_ms,
        )?;
        Self::with_source(client, settings)
    }
}

impl<S: PageSource> DirectoryClient<S> {
    pub fn with_source(source: S, settings: &ScraperSettings) -> Result<Self> {
        let cooldown = Duration::from_secs(settings.retry_cooldown_secs);
        Ok(Self {
            fetcher: PaginatedFetcher::new(source, cooldown),
            extractor: HtmlExtractor::new()?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn fetch_player_total(&mut self, citizens_only: bool) -> Result<usize, CrawlError> {
        let url = urls::player_total_url(&self.base_url, citizens_only);
        let extractor = &self.extractor;
        self.fetcher
            .fetch_parsed(&url, |body| extractor.player_total(body))
            .await
    }

    pub async fn next_player_page(
        &mut self,
        cursor: &mut OffsetCursor,
        citizens_only: bool,
    ) -> Result<Option<Page<Vec<PlayerRow>>>, CrawlError> {
        let base_url = &self.base_url;
        let extractor = &self.extractor;
        self.fetcher
            .next_page(
                cursor,
                |request| urls::player_listing_url(base_url, request, citizens_only),
                |body| extractor.player_rows(body),
            )
            .await
    }

    pub async fn fetch_tournament_total(&mut self) -> Result<usize, CrawlError> {
        let url = urls::tournament_total_url(&self.base_url);
        let extractor = &self.extractor;
        self.fetcher
            .fetch_parsed(&url, |body| extractor.tournament_total(body))
            .await
    }

    /// Walk the tournament listing and collect every tournament id
    pub async fn fetch_tournament_ids(
        &mut self,
        total: usize,
        page_size: usize,
    ) -> Result<Vec<TournamentId>, CrawlError> {
        info!("Listing {} tournaments, {} per page", total, page_size);

        let mut cursor = OffsetCursor::bounded(0, page_size, total);
        let mut ids = Vec::new();

        loop {
            let base_url = &self.base_url;
            let extractor = &self.extractor;
            let page = self
                .fetcher
                .next_page(
                    &mut cursor,
                    |request| urls::tournament_listing_url(base_url, request),
                    |body| extractor.tournament_ids(body),
                )
                .await?;

            match page {
                Some(page) => ids.extend(page.items),
                None => break,
            }
        }

        ids.truncate(total);
        Ok(ids)
    }

    pub async fn next_match_page(
        &mut self,
        tournament_id: TournamentId,
        cursor: &mut OffsetCursor,
    ) -> Result<Option<Page<MatchPage>>, CrawlError> {
        let base_url = &self.base_url;
        let extractor = &self.extractor;
        self.fetcher
            .next_page(
                cursor,
                |request| urls::match_results_url(base_url, tournament_id, request),
                |body| Ok(extractor.match_page(body)),
            )
            .await
    }

    pub fn source(&self) -> &S {
        self.fetcher.source()
    }
}

impl<S: PageSource> ProfileLookup for DirectoryClient<S> {
    /// Profile page -> external id -> id search -> listing row
    async fn lookup_profile(&mut self, id: PlayerId) -> Result<Enrichment, CrawlError> {
        let profile = urls::profile_url(&self.base_url, id);
        let extractor = &self.extractor;
        let external_id = self
            .fetcher
            .fetch_parsed(&profile, |body| extractor.external_id(body))
            .await?;
        debug!("Player {} has external id {}", id, external_id);

        let search = urls::external_id_search_url(&self.base_url, &external_id);
        let extractor = &self.extractor;
        let row = self
            .fetcher
            .fetch_parsed(&search, |body| extractor.first_player_row(body))
            .await?;

        Ok(match row {
            Some(row) => Enrichment::Found(row),
            None => Enrichment::Unresolved { external_id },
        })
    }
}
