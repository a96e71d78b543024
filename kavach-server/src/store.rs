//! Persistence collaborator: detection results and error records

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use kavach_core::RiderCounts;

/// One persisted detection outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub timestamp: String,
    pub address: String,
    pub count_helmet: u32,
    pub count_no_helmet: u32,
}

impl DetectionRecord {
    pub fn new(timestamp: String, address: String, counts: RiderCounts) -> Self {
        Self {
            timestamp,
            address,
            count_helmet: counts.count_helmet,
            count_no_helmet: counts.count_no_helmet,
        }
    }
}

/// One persisted failure. Timestamp and address are whatever the
/// request managed to supply before it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub timestamp: Option<String>,
    pub address: Option<String>,
    pub detail: String,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Datastore rejected write: {0}")]
    Rejected(String),
}

/// The hosted datastore, reduced to the two writes the service needs.
/// No retries; a failed write is reported once and given up on.
#[async_trait]
pub trait DetectionStore: Send + Sync {
    async fn record_detection(&self, record: &DetectionRecord) -> Result<(), StoreError>;
    async fn record_error(&self, record: &ErrorRecord) -> Result<(), StoreError>;
}

/// Record a failure, degrading to a process-local log line if the
/// datastore write itself fails. Never propagates an error; the
/// request pipeline must not crash because logging did.
pub async fn log_error(store: &dyn DetectionStore, record: ErrorRecord) {
    if let Err(e) = store.record_error(&record).await {
        error!(
            detail = %record.detail,
            "Failed to persist error record: {}",
            e
        );
    }
}

/// Supabase-style REST datastore client. Rows go in with a single
/// `POST /rest/v1/{table}` carrying the api key and bearer auth.
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    api_key: String,
    detection_table: String,
    error_table: String,
}

impl SupabaseStore {
    pub fn new(
        base_url: String,
        api_key: String,
        detection_table: String,
        error_table: String,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            detection_table,
            error_table,
        }
    }

    async fn insert<T: Serialize + Sync>(&self, table: &str, row: &T) -> Result<(), StoreError> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected(format!("{}: {}", status, detail)));
        }
        Ok(())
    }
}

#[async_trait]
impl DetectionStore for SupabaseStore {
    async fn record_detection(&self, record: &DetectionRecord) -> Result<(), StoreError> {
        self.insert(&self.detection_table, record).await
    }

    async fn record_error(&self, record: &ErrorRecord) -> Result<(), StoreError> {
        self.insert(&self.error_table, record).await
    }
}
