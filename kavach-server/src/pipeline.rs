//! Request pipeline: validate, detect, assemble, count, persist

use std::time::Duration;

use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::http::AppState;
use crate::store::{log_error, DetectionRecord, ErrorRecord, StoreError};
use kavach_core::{count_riders, RawSubmission, RiderCounts, ValidationError};
use kavach_eye::{assemble, Detection, Detector};

/// Everything that can end a request unsuccessfully. Each failure is
/// recorded to the datastore once and returned to the caller once; no
/// stage retries.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Failed to persist detection result: {0}")]
    Persistence(#[from] StoreError),
}

/// Run one submission through the full pipeline.
///
/// The detection result is persisted only after both counts are fully
/// computed; nothing partial is ever written.
pub async fn process(
    state: &AppState,
    raw: RawSubmission,
) -> Result<RiderCounts, PipelineError> {
    // Keep whatever context the client sent for error records
    let context_timestamp = raw.timestamp.clone();
    let context_address = raw.address.clone();

    let payload = match raw.validate() {
        Ok(payload) => payload,
        Err(e) => {
            log_error(
                state.store.as_ref(),
                ErrorRecord {
                    timestamp: context_timestamp,
                    address: context_address,
                    detail: e.to_string(),
                },
            )
            .await;
            return Err(e.into());
        }
    };

    let vehicle_detections =
        run_detector(state, state.vehicle_detector.as_ref(), &payload.image).await;
    let helmet_detections =
        run_detector(state, state.helmet_detector.as_ref(), &payload.image).await;

    let (vehicle_detections, helmet_detections) =
        match (vehicle_detections, helmet_detections) {
            (Ok(v), Ok(h)) => (v, h),
            (Err(detail), _) | (_, Err(detail)) => {
                log_error(
                    state.store.as_ref(),
                    ErrorRecord {
                        timestamp: Some(payload.timestamp),
                        address: Some(payload.address),
                        detail: detail.clone(),
                    },
                )
                .await;
                return Err(PipelineError::Inference(detail));
            }
        };

    let (vehicles, helmets) = assemble(
        &vehicle_detections,
        &helmet_detections,
        &state.config.detection,
    );
    debug!(
        vehicles = vehicles.len(),
        helmets = helmets.len(),
        "Assembled detection lists"
    );

    let counts = count_riders(&vehicles, &helmets, state.config.detection.expanding_factor);
    info!(
        address = %payload.address,
        count_helmet = counts.count_helmet,
        count_no_helmet = counts.count_no_helmet,
        "Counted riders"
    );

    let record = DetectionRecord::new(payload.timestamp.clone(), payload.address.clone(), counts);
    if let Err(e) = state.store.record_detection(&record).await {
        log_error(
            state.store.as_ref(),
            ErrorRecord {
                timestamp: Some(payload.timestamp),
                address: Some(payload.address),
                detail: e.to_string(),
            },
        )
        .await;
        return Err(e.into());
    }

    Ok(counts)
}

/// Run one model with the configured per-call timeout. Failures come
/// back as a human-readable detail string for the error record.
async fn run_detector(
    state: &AppState,
    detector: &dyn Detector,
    image: &[u8],
) -> Result<Vec<Detection>, String> {
    let budget = Duration::from_secs(state.config.detection.timeout_secs);
    match timeout(budget, detector.detect(image)).await {
        Ok(Ok(detections)) => Ok(detections),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!(
            "Inference timed out after {}s",
            state.config.detection.timeout_secs
        )),
    }
}
