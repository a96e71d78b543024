//! Error types for kavach-core

use thiserror::Error;

/// Rejection reasons for an inbound submission.
///
/// Validation never throws through the pipeline; callers get one of
/// these as a value and must branch on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required form field was absent or empty. Carries the field
    /// name, and the wording matches the API error body.
    #[error("No {0} provided")]
    MissingField(&'static str),

    /// The timestamp field was present but not ISO-8601.
    #[error("Invalid timestamp format, expected ISO-8601")]
    InvalidTimestampFormat,
}

impl ValidationError {
    /// Stable machine-readable code for the API error body.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingField(_) => "MISSING_FIELD",
            ValidationError::InvalidTimestampFormat => "INVALID_TIMESTAMP",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = ValidationError::MissingField("address");
        assert_eq!(err.to_string(), "No address provided");
    }

    #[test]
    fn test_invalid_timestamp_display() {
        let err = ValidationError::InvalidTimestampFormat;
        assert!(err.to_string().contains("ISO-8601"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ValidationError::MissingField("image").code(), "MISSING_FIELD");
        assert_eq!(
            ValidationError::InvalidTimestampFormat.code(),
            "INVALID_TIMESTAMP"
        );
    }
}
