//! Error types for the top coins tracker

use thiserror::Error;

/// Errors that can occur when fetching market data from a source
///
/// All variants own their data so a failure can be stored in the view state
/// and rendered on a later frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, TLS, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// The source answered with HTTP 429
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Any other non-2xx HTTP response
    #[error("HTTP error {status}")]
    Http { status: u16 },

    /// The response body could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Timeout waiting for a response
    #[error("Request timeout")]
    Timeout,
}

impl FetchError {
    /// True for failures caused by source rate limiting (HTTP 429)
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::RateLimited)
    }

    /// HTTP status associated with the failure, if the source responded
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::RateLimited => Some(429),
            FetchError::Http { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            match status.as_u16() {
                429 => FetchError::RateLimited,
                code => FetchError::Http { status: code },
            }
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_exposed_for_http_failures() {
        assert_eq!(FetchError::RateLimited.status(), Some(429));
        assert_eq!(FetchError::Http { status: 503 }.status(), Some(503));
        assert_eq!(FetchError::Network("connection refused".to_string()).status(), None);
        assert_eq!(FetchError::Timeout.status(), None);
    }

    #[test]
    fn only_429_counts_as_rate_limited() {
        assert!(FetchError::RateLimited.is_rate_limited());
        assert!(!FetchError::Http { status: 500 }.is_rate_limited());
        assert!(!FetchError::Network("no route to host".to_string()).is_rate_limited());
    }
}
