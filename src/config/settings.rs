use std::path::PathBuf;

use clap::ValueEnum;

use super::buckets::{BucketSpec, get_buckets};

#[derive(Debug, Clone, PartialEq)]
pub struct CrawlSettings {
    /// Crawl the whole directory; otherwise a fixed small sample
    pub full_population: bool,
    /// Look up unknown players through their profile pages
    pub eager_enrichment: bool,
    pub citizens_only: bool,
    pub player_page_cap: usize,
    pub tournament_page_cap: usize,
    pub match_page_size: usize,
    pub sample_players: usize,
    pub sample_tournaments: usize,
    pub player_progress_every: usize,
    pub tournament_progress_every: usize,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            full_population: true,
            eager_enrichment: false,
            citizens_only: false,
            player_page_cap: 1000,
            tournament_page_cap: 100,
            match_page_size: 100,
            sample_players: 5,
            sample_tournaments: 3,
            player_progress_every: 5000,
            tournament_progress_every: 50,
        }
    }
}

impl CrawlSettings {
    /// Cache key suffix so sample and full runs never share a memoized pass
    pub fn mode_key(&self) -> String {
        let mut key = String::from(if self.full_population { "full" } else { "sample" });
        if self.citizens_only {
            key.push_str("_citizens");
        }
        if self.eager_enrichment {
            key.push_str("_enriched");
        }
        key
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScraperSettings {
    pub rate_limit_ms: u64,
    pub retry_cooldown_secs: u64,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub base_url: String,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            rate_limit_ms: 1000, // 1 req/sec
            retry_cooldown_secs: 60,
            user_agent: "LocationOutcomes/1.0".to_string(),
            timeout_secs: 30,
            base_url: "https://usatt.simplycompete.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Csv,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    pub output: PathBuf,
    pub format: ReportFormat,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output: PathBuf::from("location_statistics.json"),
            format: ReportFormat::Json,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub crawl: CrawlSettings,
    pub scraper: ScraperSettings,
    pub report: ReportSettings,
    pub buckets: Vec<BucketSpec>,
    pub cities_path: PathBuf,
    pub cache_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            crawl: CrawlSettings::default(),
            scraper: ScraperSettings::default(),
            report: ReportSettings::default(),
            buckets: get_buckets(),
            cities_path: PathBuf::from("us_cities_states_counties.csv"),
            cache_dir: PathBuf::from("cache"),
        }
    }
}
