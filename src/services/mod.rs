pub mod crawl;
pub mod report;

pub use crawl::{CrawlService, MatchCounters, MatchPass, PlayerPass, load_match_pass};
pub use report::{ReportOutcome, render_report};
