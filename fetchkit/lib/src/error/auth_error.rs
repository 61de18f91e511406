//! Authentication and credential errors.

use thiserror::Error;

/// Errors obtaining or applying credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// None of the listed environment variables held a credential.
    #[error("Missing credential; checked {}", env_vars.join(", "))]
    MissingCredential { env_vars: Vec<String> },

    /// The token endpoint issued a token that had already expired.
    #[error("Token expired")]
    TokenExpired,

    /// The token endpoint answered with a non-2xx status.
    #[error("Token request failed with HTTP {status}")]
    TokenRequestFailed { status: u16 },
}
