//! Configuration for the detection boundary

use serde::{Deserialize, Serialize};

use kavach_core::DEFAULT_EXPANDING_FACTOR;

/// Per-model inference settings, forwarded to the inference
/// collaborator with each request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier understood by the inference service
    pub name: String,
    /// Inference image size hint (pixels, longest side)
    pub image_size: u32,
    /// Detections below this confidence are dropped at the boundary
    pub confidence_threshold: f32,
}

/// Settings for the whole detection stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Two-wheeler detection model
    pub vehicle_model: ModelConfig,
    /// Helmet detection model
    pub helmet_model: ModelConfig,
    /// Label the vehicle model uses for two-wheelers
    pub vehicle_class: String,
    /// Label the helmet model uses for a worn helmet. Any negative
    /// "no helmet" label the model may emit is ignored, not counted.
    pub helmet_class: String,
    /// Tolerance applied to the helmet search region
    pub expanding_factor: f32,
    /// Per-model inference timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            vehicle_model: ModelConfig {
                name: "yolov9e".to_string(),
                image_size: 1280,
                confidence_threshold: 0.2,
            },
            helmet_model: ModelConfig {
                name: "helmet".to_string(),
                image_size: 1500,
                confidence_threshold: 0.2,
            },
            vehicle_class: "motorcycle".to_string(),
            helmet_class: "helmet".to_string(),
            expanding_factor: DEFAULT_EXPANDING_FACTOR,
            timeout_secs: 30,
        }
    }
}

impl DetectionConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        for model in [&self.vehicle_model, &self.helmet_model] {
            if model.name.is_empty() {
                return Err("Model name must not be empty".to_string());
            }
            if model.image_size == 0 || model.image_size > 8192 {
                return Err("Image size must be between 1 and 8192".to_string());
            }
            if !(0.0..=1.0).contains(&model.confidence_threshold) {
                return Err("Confidence threshold must be between 0.0 and 1.0".to_string());
            }
        }

        if self.vehicle_class.is_empty() || self.helmet_class.is_empty() {
            return Err("Class labels must not be empty".to_string());
        }

        if !(0.0..=1.0).contains(&self.expanding_factor) {
            return Err("Expanding factor must be between 0.0 and 1.0".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("Timeout must be non-zero".to_string());
        }

        Ok(())
    }
}
