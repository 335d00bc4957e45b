use std::time::Duration;

use log::{debug, warn};
use tokio::time::sleep;

use crate::errors::{CrawlError, ParseError};
use crate::http::PageSource;
use crate::pagination::{OffsetCursor, PageRequest};

/// One parsed page of a result set
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub request: PageRequest,
    pub items: T,
}

/// Sequential page fetcher that waits out transport failures.
///
/// A transient failure is retried on the same URL after `retry_cooldown`,
/// with no cap on attempts. Status and parse failures are returned as is.
pub struct PaginatedFetcher<S> {
    source: S,
    retry_cooldown: Duration,
}

impl<S: PageSource> PaginatedFetcher<S> {
    pub fn new(source: S, retry_cooldown: Duration) -> Self {
        Self {
            source,
            retry_cooldown,
        }
    }

    /// Fetch a page body, retrying transient failures indefinitely
    pub async fn fetch(&mut self, url: &str) -> Result<String, CrawlError> {
        let mut attempt: u64 = 0;
        loop {
            match self.source.fetch_text(url).await {
                Ok(body) => return Ok(body),
                Err(err) if err.is_transient() => {
                    attempt += 1;
                    warn!(
                        "{}. Waiting {}s before retry #{}",
                        err,
                        self.retry_cooldown.as_secs(),
                        attempt
                    );
                    sleep(self.retry_cooldown).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    pub async fn fetch_parsed<T, P>(&mut self, url: &str, parse: P) -> Result<T, CrawlError>
    where
        P: FnOnce(&str) -> Result<T, ParseError>,
    {
        let body = self.fetch(url).await?;
        parse(&body).map_err(|e| CrawlError::parse(url, e))
    }

    /// Fetch and parse the cursor's next page, then advance the cursor.
    ///
    /// Returns `Ok(None)` once the cursor is exhausted.
    pub async fn next_page<T, U, P>(
        &mut self,
        cursor: &mut OffsetCursor,
        url_for: U,
        parse: P,
    ) -> Result<Option<Page<T>>, CrawlError>
    where
        U: FnOnce(PageRequest) -> String,
        P: FnOnce(&str) -> Result<T, ParseError>,
    {
        let Some(request) = cursor.next_request() else {
            return Ok(None);
        };

        let url = url_for(request);
        debug!("Fetching page at offset {}: {}", request.offset, url);
        let items = self.fetch_parsed(&url, parse).await?;
        cursor.advance();

        Ok(Some(Page { request, items }))
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, VecDeque};

    #[derive(Default)]
    struct ScriptedSource {
        responses: HashMap<String, VecDeque<Result<String, CrawlError>>>,
        requested: Vec<String>,
    }

    impl ScriptedSource {
        fn script(mut self, url: &str, response: Result<&str, CrawlError>) -> Self {
            self.responses
                .entry(url.to_string())
                .or_default()
                .push_back(response.map(str::to_string));
            self
        }
    }

    impl PageSource for ScriptedSource {
        async fn fetch_text(&mut self, url: &str) -> Result<String, CrawlError> {
            self.requested.push(url.to_string());
            self.responses
                .get_mut(url)
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| {
                    Err(CrawlError::Status {
                        url: url.to_string(),
                        status: 404,
                    })
                })
        }
    }

    fn count_rows(body: &str) -> Result<usize, ParseError> {
        if body.starts_with("rows:") {
            Ok(body.trim_start_matches("rows:").len())
        } else {
            Err(ParseError::MissingElement("rows"))
        }
    }

    #[tokio::test]
    async fn transient_failures_are_retried_on_the_same_page() {
        let source = ScriptedSource::default()
            .script("p0", Err(CrawlError::transient("p0", "timed out")))
            .script("p0", Err(CrawlError::transient("p0", "connection reset")))
            .script("p0", Ok("rows:ab"));
        let mut fetcher = PaginatedFetcher::new(source, Duration::ZERO);

        let rows = fetcher.fetch_parsed("p0", count_rows).await.unwrap();
        assert_eq!(rows, 2);
        assert_eq!(fetcher.source().requested, vec!["p0", "p0", "p0"]);
    }

    #[tokio::test]
    async fn parse_failures_are_not_retried() {
        let source = ScriptedSource::default()
            .script("p0", Ok("<html>maintenance</html>"))
            .script("p0", Ok("rows:a"));
        let mut fetcher = PaginatedFetcher::new(source, Duration::ZERO);

        let err = fetcher.fetch_parsed("p0", count_rows).await.unwrap_err();
        assert!(matches!(err, CrawlError::Parse { .. }));
        assert_eq!(fetcher.source().requested.len(), 1);
    }

    #[tokio::test]
    async fn status_failures_surface() {
        let mut fetcher = PaginatedFetcher::new(ScriptedSource::default(), Duration::ZERO);
        let err = fetcher.fetch("missing").await.unwrap_err();
        assert!(matches!(err, CrawlError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn pages_are_walked_until_the_bound() {
        let source = ScriptedSource::default()
            .script("o0", Ok("rows:aa"))
            .script("o2", Err(CrawlError::transient("o2", "reset")))
            .script("o2", Ok("rows:aa"))
            .script("o4", Ok("rows:a"));
        let mut fetcher = PaginatedFetcher::new(source, Duration::ZERO);
        let mut cursor = OffsetCursor::bounded(0, 2, 5);

        let mut offsets = Vec::new();
        let mut total = 0;
        while let Some(page) = fetcher
            .next_page(&mut cursor, |r| format!("o{}", r.offset), count_rows)
            .await
            .unwrap()
        {
            offsets.push(page.request.offset);
            total += page.items;
        }

        assert_eq!(offsets, vec![0, 2, 4]);
        assert_eq!(total, 5);
        assert_eq!(fetcher.source().requested, vec!["o0", "o2", "o2", "o4"]);
    }

    #[tokio::test]
    async fn failed_page_does_not_advance_the_cursor() {
        let source = ScriptedSource::default().script("o0", Ok("garbage"));
        let mut fetcher = PaginatedFetcher::new(source, Duration::ZERO);
        let mut cursor = OffsetCursor::bounded(0, 2, 4);

        let result = fetcher
            .next_page(&mut cursor, |r| format!("o{}", r.offset), count_rows)
            .await;
        assert!(result.is_err());
        assert_eq!(cursor.offset(), 0);
    }
}
