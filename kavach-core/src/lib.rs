//! kavach-core: rider counting and request validation
//!
//! The pure logic behind the helmet-compliance service: bounding-box
//! geometry, the helmet-to-vehicle proximity matcher, the greedy rider
//! counter, and the multipart-request validator. No I/O lives here;
//! detection models and persistence are collaborators owned by the
//! server crate.

pub mod bbox;
pub mod counter;
pub mod error;
pub mod matcher;
pub mod validator;

pub use bbox::BoundingBox;
pub use counter::{count_riders, RiderCounts, DEFAULT_EXPANDING_FACTOR};
pub use error::ValidationError;
pub use matcher::is_match;
pub use validator::{RawSubmission, RequestPayload};
