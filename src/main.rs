use anyhow::Result;

use location_outcomes::cli::Command;
use location_outcomes::{handle_aggregate, handle_completions, handle_crawl, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Crawl(args) => handle_crawl(args),
        Command::Aggregate { mode, report } => handle_aggregate(mode, report),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
