//! Error types for kavach-eye

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid inference response: {0}")]
    InvalidResponse(String),

    #[error("Model error: {0}")]
    Model(String),
}
