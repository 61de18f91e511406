//! HTTP method names.

use strum::{Display, EnumIter, EnumString};

use crate::error::ConfigError;

/// Typed names for the methods endpoints use.
///
/// Pipelines carry the method as a string so extension methods pass through;
/// convert with `String::from` when handing one to [`crate::method`].
///
/// ## Examples
///
/// ```rust
/// use fetchkit_lib::RestMethod;
///
/// let parsed: RestMethod = "PATCH".parse().unwrap();
/// assert_eq!(parsed, RestMethod::Patch);
/// assert_eq!(String::from(RestMethod::Get), "GET");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
pub enum RestMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
}

impl From<RestMethod> for String {
    fn from(method: RestMethod) -> Self {
        method.to_string()
    }
}

/// Resolves a method name to a `reqwest::Method`.
///
/// Known names are normalized to upper case; anything else is sent verbatim
/// as an extension method.
///
/// ## Errors
///
/// Returns [`ConfigError::InvalidMethod`] if `name` is not a valid HTTP token.
pub fn to_reqwest_method(name: &str) -> Result<reqwest::Method, ConfigError> {
    let canonical = name
        .parse::<RestMethod>()
        .map(String::from)
        .unwrap_or_else(|_| name.to_string());
    reqwest::Method::from_bytes(canonical.as_bytes())
        .map_err(|_| ConfigError::InvalidMethod(name.to_string()))
}
