//! Builder and target configuration errors.

use thiserror::Error;

/// Something about the request could not be turned into a valid HTTP call.
///
/// Raised before anything goes over the wire; retrying will not help.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The resolved target is not an absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A header name or value was rejected by the HTTP layer.
    #[error("Invalid header `{name}`: {message}")]
    InvalidHeader { name: String, message: String },

    /// The HTTP method name is not a valid token.
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// A mock route pattern did not compile.
    #[error("Invalid route pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl ConfigError {
    pub fn invalid_header(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            message: message.into(),
        }
    }
}
