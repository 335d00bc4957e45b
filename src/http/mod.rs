mod client;

pub use client::RateLimitedClient;

use crate::errors::CrawlError;

/// Anything that can return the body of a page for a URL
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch_text(&mut self, url: &str) -> Result<String, CrawlError>;
}
