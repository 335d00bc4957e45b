use thiserror::Error;

/// Failure while turning a fetched page into structured data.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("missing {0}")]
    MissingElement(&'static str),

    #[error("invalid {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("invalid selector {css}: {reason}")]
    Selector { css: &'static str, reason: String },
}

/// Failure of a single page fetch, classified for the retry loop.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Timeout, reset or any other transport failure. Always retried.
    #[error("transient failure fetching {url}: {reason}")]
    Transient { url: String, reason: String },

    /// The request could not be built, e.g. a malformed URL. Never retried.
    #[error("invalid request {url}: {reason}")]
    InvalidRequest { url: String, reason: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to parse {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: ParseError,
    },
}

impl CrawlError {
    pub fn transient(url: &str, reason: impl ToString) -> Self {
        Self::Transient {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(url: &str, source: ParseError) -> Self {
        Self::Parse {
            url: url.to_string(),
            source,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

/// Add context to pass errors
pub fn pass_context(pass: &str) -> String {
    format!("{} pass aborted", pass)
}

/// Add context to cache errors
pub fn cache_context(operation: &str, key: &str) -> String {
    format!("Failed to {} cache for key: {}", operation, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_failures_are_transient() {
        assert!(CrawlError::transient("http://x", "timed out").is_transient());
        assert!(
            !CrawlError::Status {
                url: "http://x".into(),
                status: 404
            }
            .is_transient()
        );
        assert!(!CrawlError::parse("http://x", ParseError::MissingElement("table")).is_transient());
    }

    #[test]
    fn parse_error_names_the_page() {
        let err = CrawlError::parse("http://x/t/search", ParseError::MissingElement("tournament table"));
        assert_eq!(
            err.to_string(),
            "failed to parse http://x/t/search: missing tournament table"
        );
    }
}
