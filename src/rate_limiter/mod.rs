use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// Enforces a fixed minimum interval between consecutive requests
pub struct RateLimiter {
    delay: Duration,
    last_request: Option<Instant>,
    request_count: usize,
}

impl RateLimiter {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            last_request: None,
            request_count: 0,
        }
    }

    pub async fn wait(&mut self) {
        if let Some(ready_at) = self.next_slot() {
            sleep_until(ready_at).await;
        }
        self.last_request = Some(Instant::now());
        self.request_count += 1;
    }

    pub fn request_count(&self) -> usize {
        self.request_count
    }

    fn next_slot(&self) -> Option<Instant> {
        self.last_request.map(|last| last + self.delay)
    }
}
