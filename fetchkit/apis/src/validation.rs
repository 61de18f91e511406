//! Argument checks shared by the API clients.
//!
//! Every check runs inside a declaration function, so a bad argument fails
//! the call before anything touches the network.

use std::fmt::Display;
use std::ops::RangeInclusive;

use fetchkit_lib::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

/// `<digits>d` or `<digits>h`, as accepted by Flickr's activity feeds.
static TIMEFRAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(d|h)$").expect("Invalid regex"));

/// Fails unless `value` lies in `range`.
pub(crate) fn in_range<T>(
    field: &str,
    value: T,
    range: RangeInclusive<T>,
) -> Result<(), ValidationError>
where
    T: PartialOrd + Display,
{
    if range.contains(&value) {
        Ok(())
    } else {
        let message = format!("{value} is outside {}..={}", range.start(), range.end());
        Err(ValidationError::invalid(field, message))
    }
}

/// Like [`in_range`], skipping absent values.
pub(crate) fn opt_in_range<T>(
    field: &str,
    value: Option<T>,
    range: RangeInclusive<T>,
) -> Result<(), ValidationError>
where
    T: PartialOrd + Display,
{
    match value {
        Some(value) => in_range(field, value, range),
        None => Ok(()),
    }
}

/// Fails when `value` is below `min`.
pub(crate) fn at_least(field: &str, value: Option<u32>, min: u32) -> Result<(), ValidationError> {
    match value {
        Some(value) if value < min => Err(ValidationError::invalid(
            field,
            format!("{value} is less than {min}"),
        )),
        _ => Ok(()),
    }
}

/// Fails when a required string is empty.
pub(crate) fn non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::invalid(field, "must not be empty"))
    } else {
        Ok(())
    }
}

/// Checks a Flickr activity timeframe such as `"7d"` or `"12h"`.
pub(crate) fn timeframe(field: &str, value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(value) if !TIMEFRAME.is_match(value) => Err(ValidationError::invalid(
            field,
            format!("`{value}` must be a number followed by `d` or `h`"),
        )),
        _ => Ok(()),
    }
}
