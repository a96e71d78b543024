//! Inbound request validation

use bytes::Bytes;
use chrono::DateTime;

use crate::error::ValidationError;

/// The fields of a submission as they arrive off the wire, before any
/// checking. A field the client never sent is `None`.
#[derive(Debug, Clone, Default)]
pub struct RawSubmission {
    pub timestamp: Option<String>,
    pub address: Option<String>,
    pub image: Option<Bytes>,
}

/// A submission that passed validation: all fields present and the
/// timestamp confirmed ISO-8601. The timestamp is kept in the exact
/// form the camera sent so it can be persisted unmodified.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPayload {
    pub timestamp: String,
    pub address: String,
    pub image: Bytes,
}

impl RawSubmission {
    /// Check the submission and decompose it into a [`RequestPayload`].
    ///
    /// Checks run in a fixed order: timestamp presence, address
    /// presence, image presence, then timestamp format. The first
    /// failing check wins and the rest are skipped. An empty string or
    /// empty file counts as missing.
    pub fn validate(self) -> Result<RequestPayload, ValidationError> {
        let timestamp = self
            .timestamp
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::MissingField("timestamp"))?;
        let address = self
            .address
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::MissingField("address"))?;
        let image = self
            .image
            .filter(|b| !b.is_empty())
            .ok_or(ValidationError::MissingField("image"))?;

        // RFC 3339 parsing accepts both the `Z` suffix and an explicit
        // numeric offset.
        if DateTime::parse_from_rfc3339(&timestamp).is_err() {
            return Err(ValidationError::InvalidTimestampFormat);
        }

        Ok(RequestPayload {
            timestamp,
            address,
            image,
        })
    }
}
