//! Call argument validation errors.

use thiserror::Error;

/// Errors raised while turning call arguments into a request.
///
/// These always surface before the request primitive is invoked.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A field failed a range or format check.
    #[error("Invalid value for `{field}`: {message}")]
    InvalidField {
        /// The offending field name.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// Query parameters must serialize to a JSON object.
    #[error("Query parameters must be an object, found {found}")]
    NotAnObject {
        /// The JSON kind that was produced instead.
        found: &'static str,
    },

    /// The arguments could not be serialized.
    #[error("Failed to serialize arguments: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ValidationError {
    /// Creates an invalid field error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_field_display() {
        let err = ValidationError::invalid("per_page", "must be between 1 and 500");
        assert_eq!(
            err.to_string(),
            "Invalid value for `per_page`: must be between 1 and 500"
        );
    }

    #[test]
    fn test_not_an_object_display() {
        let err = ValidationError::NotAnObject { found: "array" };
        assert!(err.to_string().contains("array"));
    }
}
