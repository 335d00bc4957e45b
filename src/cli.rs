use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::config::settings::{AppConfig, ReportFormat};

#[derive(Parser, Debug)]
#[command(author, version, about = "Win/loss outcomes by rating bucket and location")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Crawl players and tournaments, then write the location report
    Crawl(CrawlArgs),
    /// Rebuild the report from the cached match pass, without network access
    Aggregate {
        #[command(flatten)]
        mode: ModeArgs,
        #[command(flatten)]
        report: ReportArgs,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Flags that select which population is crawled
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ModeArgs {
    /// Crawl a small fixed sample instead of the whole directory
    #[arg(long)]
    pub sample: bool,
    /// Look up players missing from the listing through their profiles
    #[arg(long)]
    pub enrich: bool,
    /// Restrict the listing to US citizens
    #[arg(long)]
    pub citizens_only: bool,
    /// Directory for memoized passes
    #[arg(long, default_value = "cache")]
    pub cache_dir: PathBuf,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ReportArgs {
    /// Report file
    #[arg(short, long, default_value = "location_statistics.json")]
    pub output: PathBuf,
    #[arg(long, value_enum, default_value_t = ReportFormat::Json)]
    pub format: ReportFormat,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct CrawlArgs {
    #[command(flatten)]
    pub mode: ModeArgs,
    #[command(flatten)]
    pub report: ReportArgs,
    /// Ignore memoized passes and crawl again
    #[arg(long)]
    pub refresh: bool,
    /// Directory site root
    #[arg(long)]
    pub base_url: Option<String>,
    /// Pipe-separated city/state table
    #[arg(long, default_value = "us_cities_states_counties.csv")]
    pub cities: PathBuf,
}

impl ModeArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        config.crawl.full_population = !self.sample;
        config.crawl.eager_enrichment = self.enrich;
        config.crawl.citizens_only = self.citizens_only;
        config.cache_dir = self.cache_dir.clone();
    }
}

impl ReportArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        config.report.output = self.output.clone();
        config.report.format = self.format;
    }
}

impl CrawlArgs {
    pub fn to_config(&self) -> AppConfig {
        let mut config = AppConfig::new();
        self.mode.apply(&mut config);
        self.report.apply(&mut config);
        if let Some(base_url) = &self.base_url {
            config.scraper.base_url = base_url.clone();
        }
        config.cities_path = self.cities.clone();
        config
    }
}
