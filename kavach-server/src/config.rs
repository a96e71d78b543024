//! Server configuration, loaded from the environment

use serde::{Deserialize, Serialize};

use kavach_eye::DetectionConfig;

/// Process-level configuration.
///
/// Sourced from the environment the way the deployment provisions it:
/// `DATABASE_URL` / `DATABASE_KEY` for the hosted datastore,
/// `INFERENCE_URL` for the detection collaborator, `KAVACH_LISTEN_ADDR`
/// for the bind address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `0.0.0.0:8080`
    pub listen_addr: String,
    /// Base URL of the hosted datastore (Supabase-style REST)
    pub database_url: String,
    /// API key for the datastore
    pub database_key: String,
    /// Table receiving detection results
    pub detection_table: String,
    /// Table receiving error records
    pub error_table: String,
    /// Endpoint of the inference collaborator
    pub inference_url: String,
    /// Detection stage settings
    pub detection: DetectionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            database_url: String::new(),
            database_key: String::new(),
            detection_table: "HelmetDetection".to_string(),
            error_table: "DetectionErrors".to_string(),
            inference_url: String::new(),
            detection: DetectionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Build a configuration from environment variables, falling back
    /// to defaults for everything optional.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var("KAVACH_LISTEN_ADDR") {
            config.listen_addr = addr;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = url;
        }
        if let Ok(key) = std::env::var("DATABASE_KEY") {
            config.database_key = key;
        }
        if let Ok(table) = std::env::var("KAVACH_DETECTION_TABLE") {
            config.detection_table = table;
        }
        if let Ok(table) = std::env::var("KAVACH_ERROR_TABLE") {
            config.error_table = table;
        }
        if let Ok(url) = std::env::var("INFERENCE_URL") {
            config.inference_url = url;
        }
        config
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_addr.is_empty() {
            return Err("Listen address must not be empty".to_string());
        }
        if self.database_url.is_empty() {
            return Err("DATABASE_URL must be set".to_string());
        }
        if self.database_key.is_empty() {
            return Err("DATABASE_KEY must be set".to_string());
        }
        if self.detection_table.is_empty() || self.error_table.is_empty() {
            return Err("Table names must not be empty".to_string());
        }
        if self.inference_url.is_empty() {
            return Err("INFERENCE_URL must be set".to_string());
        }
        self.detection.validate()
    }
}
