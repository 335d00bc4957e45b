use anyhow::{Context, Result};
use log::debug;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::PageSource;
use crate::errors::CrawlError;
use crate::rate_limiter::RateLimiter;

/// HTTP client with built-in rate limiting
pub struct RateLimitedClient {
    client: Client,
    rate_limiter: RateLimiter,
}

impl RateLimitedClient {
    pub fn new(user_agent: &str, timeout_secs: u64, rate_limit_ms: u64) -> Result<Self> {
        let client = Self::build_client(user_agent, timeout_secs)?;
        let rate_limiter = RateLimiter::new(rate_limit_ms);

        Ok(Self {
            client,
            rate_limiter,
        })
    }

    pub async fn get(&mut self, url: &str) -> Result<reqwest::Response, CrawlError> {
        self.rate_limiter.wait().await;
        self.send_get_request(url).await
    }

    fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }

    async fn send_get_request(&self, url: &str) -> Result<reqwest::Response, CrawlError> {
        debug!("GET {}", url);
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_send_error(url, e))
    }
}

impl PageSource for RateLimitedClient {
    async fn fetch_text(&mut self, url: &str) -> Result<String, CrawlError> {
        let response = self.get(url).await?;
        check_status(url, response.status())?;
        response
            .text()
            .await
            .map_err(|e| CrawlError::transient(url, e))
    }
}

/// Malformed URLs will never succeed; everything else on the wire is transient.
fn classify_send_error(url: &str, error: reqwest::Error) -> CrawlError {
    if error.is_builder() {
        return CrawlError::InvalidRequest {
            url: url.to_string(),
            reason: error.to_string(),
        };
    }
    CrawlError::transient(url, error)
}

/// Server-side hiccups and throttling count as transient; other
/// non-success statuses are final.
fn check_status(url: &str, status: StatusCode) -> Result<(), CrawlError> {
    if status.is_success() {
        return Ok(());
    }
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        return Err(CrawlError::transient(url, format!("HTTP {}", status)));
    }
    Err(CrawlError::Status {
        url: url.to_string(),
        status: status.as_u16(),
    })
}
