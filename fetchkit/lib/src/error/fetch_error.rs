//! Top-level pipeline error type.

use super::{AuthError, ConfigError, HttpStatusError, ParseError, TransportError, ValidationError};
use thiserror::Error;

/// Top-level error type for every request made through a composed pipeline.
///
/// Transformers pass errors through untouched; only `retry` swallows the
/// failures of intermediate attempts.
///
/// ## Examples
///
/// ```rust,ignore
/// use fetchkit_lib::FetchError;
///
/// fn handle_error(err: FetchError) {
///     match err {
///         FetchError::Transport(e) => eprintln!("Network error: {e}"),
///         FetchError::Status(e) => eprintln!("Server said {}", e.status()),
///         FetchError::Parse(e) => eprintln!("Unreadable body: {e}"),
///         FetchError::Validation(e) => eprintln!("Bad arguments: {e}"),
///         FetchError::Config(e) => eprintln!("Configuration error: {e}"),
///         FetchError::Auth(e) => eprintln!("Auth failed: {e}"),
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request primitive rejected (DNS, connection, timeout).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A non-2xx response surfaced by an ok-checking endpoint.
    #[error(transparent)]
    Status(#[from] HttpStatusError),

    /// The response body could not be consumed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Call arguments failed validation before dispatch.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Builder, URL, or header configuration errors.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Authentication and credential errors.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl FetchError {
    /// Whether `retry` should attempt the request again.
    ///
    /// Only retryable transport failures qualify; status, parse, validation,
    /// configuration and auth errors repeat identically on every attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Returns the offending response for status errors.
    pub fn response(&self) -> Option<&crate::Response> {
        match self {
            Self::Status(e) => Some(e.response()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(ParseError::Json(err))
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        Self::Config(ConfigError::InvalidUrl(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Response;

    #[test]
    fn test_only_transport_failures_are_retryable() {
        let timeout: FetchError = TransportError::Timeout { duration_ms: 5000 }.into();
        assert!(timeout.is_retryable());

        let unrouted: FetchError = TransportError::NoMock {
            method: "GET".into(),
            url: "https://mock.test/".into(),
        }
        .into();
        assert!(!unrouted.is_retryable());

        let json_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        assert!(!FetchError::from(json_err).is_retryable());
    }

    #[test]
    fn test_status_error_exposes_response() {
        let response = Response::new(404, "missing");
        let err: FetchError = HttpStatusError::new(response).into();

        assert!(!err.is_retryable());
        assert_eq!(err.response().map(Response::status), Some(404));
    }

    #[test]
    fn test_serde_json_error_is_parse() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: FetchError = json_err.into();
        assert!(matches!(err, FetchError::Parse(ParseError::Json(_))));
    }

    #[test]
    fn test_error_display_is_transparent() {
        let err = FetchError::Auth(AuthError::TokenExpired);
        assert_eq!(err.to_string(), "Token expired");
    }
}
