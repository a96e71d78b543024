//! HTTP server with the camera-facing API routes

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ServerConfig;
use crate::pipeline::{self, PipelineError};
use crate::store::DetectionStore;
use kavach_core::RawSubmission;
use kavach_eye::Detector;

/// Shared per-process state. The detector handles and the datastore
/// client are constructed once at startup and injected here; request
/// handlers never reach for globals.
#[derive(Clone)]
pub struct AppState {
    pub vehicle_detector: Arc<dyn Detector>,
    pub helmet_detector: Arc<dyn Detector>,
    pub store: Arc<dyn DetectionStore>,
    pub config: Arc<ServerConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/processImage", post(process_image_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index_handler() -> &'static str {
    "Kavach: real-time helmet compliance detection"
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// `POST /processImage` — multipart form with `timestamp`, `address`
/// and an `image` file. Returns the rider counts on success.
async fn process_image_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    let mut raw = RawSubmission::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Rejected malformed multipart body: {}", e);
                let response = Json(ErrorResponse {
                    error: format!("Malformed multipart body: {}", e),
                    code: "INVALID_MULTIPART".to_string(),
                });
                return (StatusCode::BAD_REQUEST, response).into_response();
            }
        };

        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("timestamp") => match field.text().await {
                Ok(text) => raw.timestamp = Some(text),
                Err(e) => return bad_field("timestamp", e),
            },
            Some("address") => match field.text().await {
                Ok(text) => raw.address = Some(text),
                Err(e) => return bad_field("address", e),
            },
            Some("image") => match field.bytes().await {
                Ok(bytes) => raw.image = Some(bytes),
                Err(e) => return bad_field("image", e),
            },
            // Unknown fields are ignored, not rejected
            _ => {}
        }
    }

    match pipeline::process(&state, raw).await {
        Ok(counts) => (StatusCode::OK, Json(counts)).into_response(),
        Err(PipelineError::Validation(e)) => {
            let response = Json(ErrorResponse {
                error: e.to_string(),
                code: e.code().to_string(),
            });
            (StatusCode::BAD_REQUEST, response).into_response()
        }
        Err(PipelineError::Inference(detail)) => {
            let response = Json(ErrorResponse {
                error: detail,
                code: "INFERENCE_FAILED".to_string(),
            });
            (StatusCode::BAD_GATEWAY, response).into_response()
        }
        Err(PipelineError::Persistence(e)) => {
            let response = Json(ErrorResponse {
                error: e.to_string(),
                code: "PERSISTENCE_FAILED".to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, response).into_response()
        }
    }
}

fn bad_field(name: &str, err: axum::extract::multipart::MultipartError) -> Response {
    warn!("Failed to read multipart field {}: {}", name, err);
    let response = Json(ErrorResponse {
        error: format!("Unreadable field {}: {}", name, err),
        code: "INVALID_MULTIPART".to_string(),
    });
    (StatusCode::BAD_REQUEST, response).into_response()
}
