//! Response body parsing errors.

use thiserror::Error;

/// Errors while consuming a response body.
///
/// Parsing failures are never retried.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The body is not valid UTF-8 text.
    #[error("Invalid UTF-8 body: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
