pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod fetchers;
pub mod http;
pub mod pagination;
pub mod rate_limiter;
pub mod report;
pub mod services;
pub mod stats;

use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;

use crate::cache::Cache;
use crate::cli::{Command, CrawlArgs, ModeArgs, ReportArgs};
use crate::config::settings::{AppConfig, ReportSettings};
use crate::domain::OutcomeMatrix;
use crate::report::open_sink;
use crate::services::{CrawlService, ReportOutcome, load_match_pass, render_report};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_crawl(args: &CrawlArgs) -> Result<()> {
    let config = args.to_config();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let pass = runtime.block_on(async {
        let cache = Cache::new(&config.cache_dir)?;
        let mut service = CrawlService::new(&config)?;
        service.run(&cache, args.refresh).await
    })?;

    publish(&pass.matrix, &config.report)
}

pub fn handle_aggregate(mode: &ModeArgs, report: &ReportArgs) -> Result<()> {
    let mut config = AppConfig::new();
    mode.apply(&mut config);
    report.apply(&mut config);

    let cache = Cache::new(&config.cache_dir)?;
    let pass = load_match_pass(&cache, &config.crawl)?;
    publish(&pass.matrix, &config.report)
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}

fn publish(matrix: &OutcomeMatrix, settings: &ReportSettings) -> Result<()> {
    match render_report(matrix, || open_sink(settings))? {
        ReportOutcome::Rendered { buckets } => {
            println!("Wrote {} rating buckets to {}", buckets, settings.output.display());
        }
        ReportOutcome::NothingToRender => {
            println!("Nothing to render: no outcomes were recorded");
        }
    }
    Ok(())
}
