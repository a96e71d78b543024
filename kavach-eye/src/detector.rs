//! Object-detection collaborator boundary

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ModelConfig;
use crate::error::DetectorError;
use kavach_core::BoundingBox;

/// One detected object instance.
///
/// Coordinates are kept exactly as the model emitted them; the counter
/// normalizes them when it does geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
}

/// A pretrained object-detection model, treated as a black box: image
/// bytes in, labeled boxes out.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(&self, image: &[u8]) -> Result<Vec<Detection>, DetectorError>;
}

/// Wire shape of the inference service's response.
#[derive(Debug, Deserialize)]
struct InferenceResponse {
    detections: Vec<WireDetection>,
}

#[derive(Debug, Deserialize)]
struct WireDetection {
    label: String,
    confidence: f32,
    #[serde(rename = "box")]
    bbox: [f32; 4],
}

/// [`Detector`] backed by a remote HTTP inference service.
///
/// Posts the raw image bytes and the model settings, gets JSON
/// detections back, and drops anything under the configured confidence
/// threshold before handing detections on.
pub struct RemoteDetector {
    client: Client,
    endpoint: String,
    model: ModelConfig,
}

impl RemoteDetector {
    pub fn new(endpoint: String, model: ModelConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            model,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model.name
    }

    fn convert(&self, response: InferenceResponse) -> Vec<Detection> {
        response
            .detections
            .into_iter()
            .filter(|d| d.confidence >= self.model.confidence_threshold)
            .map(|d| Detection {
                label: d.label,
                confidence: d.confidence,
                bbox: BoundingBox::new(d.bbox[0], d.bbox[1], d.bbox[2], d.bbox[3]),
            })
            .collect()
    }
}

#[async_trait]
impl Detector for RemoteDetector {
    async fn detect(&self, image: &[u8]) -> Result<Vec<Detection>, DetectorError> {
        debug!(model = %self.model.name, bytes = image.len(), "Running remote inference");

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[
                ("model", self.model.name.as_str()),
                ("imgsz", &self.model.image_size.to_string()),
                ("conf", &self.model.confidence_threshold.to_string()),
            ])
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DetectorError::Model(format!(
                "Inference service returned {}: {}",
                status, detail
            )));
        }

        let parsed: InferenceResponse = response
            .json()
            .await
            .map_err(|e| DetectorError::InvalidResponse(e.to_string()))?;

        let detections = self.convert(parsed);
        debug!(
            model = %self.model.name,
            count = detections.len(),
            "Inference complete"
        );
        Ok(detections)
    }
}
