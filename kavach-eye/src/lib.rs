//! kavach-eye: detection boundary for the helmet-compliance service
//!
//! Wraps the object-detection collaborators behind a [`Detector`]
//! trait, filters their raw output down to the vehicle and helmet box
//! lists the counter consumes, and carries the per-model configuration
//! (class labels, confidence thresholds, image size hints).

pub mod assembler;
pub mod config;
pub mod detector;
pub mod error;

pub use assembler::assemble;
pub use config::{DetectionConfig, ModelConfig};
pub use detector::{Detection, Detector, RemoteDetector};
pub use error::DetectorError;
