//! Layered error types for the fetch pipeline.
//!
//! The error hierarchy mirrors where a failure happens in a request's life:
//! - [`FetchError`] - Top-level error returned by every pipeline call
//! - [`TransportError`] - The request primitive itself failed (network, timeout)
//! - [`HttpStatusError`] - A well-formed response carried a non-2xx status
//! - [`ParseError`] - The response body could not be read as JSON or text
//! - [`ValidationError`] - Call arguments were rejected before any request was made
//! - [`ConfigError`] - Builder or target configuration is invalid
//! - [`AuthError`] - Credentials were missing or could not be obtained

mod auth_error;
mod config_error;
mod fetch_error;
mod parse_error;
mod status_error;
mod transport_error;
mod validation_error;

pub use auth_error::AuthError;
pub use config_error::ConfigError;
pub use fetch_error::FetchError;
pub use parse_error::ParseError;
pub use status_error::HttpStatusError;
pub use transport_error::TransportError;
pub use validation_error::ValidationError;

/// Convenience result type for pipeline operations.
pub type Result<T> = std::result::Result<T, FetchError>;
