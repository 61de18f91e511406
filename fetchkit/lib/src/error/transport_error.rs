//! Request primitive and network errors.

use thiserror::Error;

/// Failures of the request primitive itself.
///
/// These are the only failures `retry` treats as retryable attempts; a
/// response with an error status is a value, not a transport error.
#[derive(Debug, Error)]
pub enum TransportError {
    /// reqwest gave up on the request for a reason not covered below.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// No response arrived within the primitive's timeout.
    #[error("Request timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// The server could not be reached.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// `FetchMock` had no route for the request.
    #[error("No mock data available for {method} {url}")]
    NoMock { method: String, url: String },

    /// Reported by a custom primitive.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Whether sending the same request again could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NoMock { .. } => false,
            Self::Request(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Timeout { .. } | Self::Connection(_) | Self::Other(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_are_worth_another_attempt() {
        let timeout = TransportError::Timeout { duration_ms: 250 };
        assert!(timeout.is_retryable());
        assert_eq!(timeout.to_string(), "Request timeout after 250ms");
    }

    #[test]
    fn refused_connections_are_worth_another_attempt() {
        assert!(TransportError::Connection("refused".into()).is_retryable());
        assert!(TransportError::Other("socket closed".into()).is_retryable());
    }

    #[test]
    fn unrouted_mock_requests_fail_immediately() {
        let unrouted = TransportError::NoMock {
            method: "DELETE".to_string(),
            url: "https://mock.test/v1/files/abc".to_string(),
        };
        assert!(!unrouted.is_retryable());
        assert_eq!(
            unrouted.to_string(),
            "No mock data available for DELETE https://mock.test/v1/files/abc"
        );
    }
}
