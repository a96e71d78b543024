//! Router-level tests for the camera-facing API
//!
//! Exercise the full HTTP surface with stub detection and persistence
//! collaborators: multipart parsing, validation responses, rider
//! counting, and the error taxonomy status mapping.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use kavach_core::BoundingBox;
use kavach_eye::{Detection, Detector, DetectorError};
use kavach_server::store::{DetectionRecord, DetectionStore, ErrorRecord, StoreError};
use kavach_server::{router, AppState, ServerConfig};

const BOUNDARY: &str = "kavach-test-boundary";

struct StubDetector {
    detections: Vec<Detection>,
    fail: bool,
}

#[async_trait]
impl Detector for StubDetector {
    async fn detect(&self, _image: &[u8]) -> Result<Vec<Detection>, DetectorError> {
        if self.fail {
            return Err(DetectorError::Model("model unavailable".to_string()));
        }
        Ok(self.detections.clone())
    }
}

#[derive(Default)]
struct MemoryStore {
    detections: Mutex<Vec<DetectionRecord>>,
    errors: Mutex<Vec<ErrorRecord>>,
    fail_detections: bool,
}

#[async_trait]
impl DetectionStore for MemoryStore {
    async fn record_detection(&self, record: &DetectionRecord) -> Result<(), StoreError> {
        if self.fail_detections {
            return Err(StoreError::Rejected("insert denied".to_string()));
        }
        self.detections.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn record_error(&self, record: &ErrorRecord) -> Result<(), StoreError> {
        self.errors.lock().unwrap().push(record.clone());
        Ok(())
    }
}

fn detection(label: &str, bbox: (f32, f32, f32, f32)) -> Detection {
    Detection {
        label: label.to_string(),
        confidence: 0.8,
        bbox: BoundingBox::from(bbox),
    }
}

fn app(
    vehicles: Vec<Detection>,
    helmets: Vec<Detection>,
    store: Arc<MemoryStore>,
) -> axum::Router {
    router(AppState {
        vehicle_detector: Arc::new(StubDetector {
            detections: vehicles,
            fail: false,
        }),
        helmet_detector: Arc::new(StubDetector {
            detections: helmets,
            fail: false,
        }),
        store,
        config: Arc::new(ServerConfig::default()),
    })
}

/// Hand-built multipart body; `None` skips the field entirely.
fn multipart_body(
    timestamp: Option<&str>,
    address: Option<&str>,
    image: Option<&[u8]>,
) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(timestamp) = timestamp {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"timestamp\"\r\n\r\n{timestamp}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(address) = address {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"address\"\r\n\r\n{address}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(image) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"frame.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(image);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn process_image_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/processImage")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_index_route() {
    let app = app(vec![], vec![], Arc::new(MemoryStore::default()));
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains("helmet"));
}

#[tokio::test]
async fn test_health_route() {
    let app = app(vec![], vec![], Arc::new(MemoryStore::default()));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_process_image_happy_path() {
    let store = Arc::new(MemoryStore::default());
    let app = app(
        vec![detection("motorcycle", (100.0, 100.0, 200.0, 200.0))],
        vec![detection("helmet", (120.0, 50.0, 180.0, 90.0))],
        store.clone(),
    );

    let body = multipart_body(
        Some("2024-07-26T10:00:00Z"),
        Some("123 Main St, Anytown"),
        Some(b"\xff\xd8\xff"),
    );
    let response = app.oneshot(process_image_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["count_helmet"], 1);
    assert_eq!(json["count_no_helmet"], 0);

    let persisted = store.detections.lock().unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].timestamp, "2024-07-26T10:00:00Z");
    assert_eq!(persisted[0].address, "123 Main St, Anytown");
}

#[tokio::test]
async fn test_missing_address_is_rejected() {
    let store = Arc::new(MemoryStore::default());
    let app = app(vec![], vec![], store.clone());

    let body = multipart_body(Some("2024-07-26T10:00:00Z"), None, Some(b"\xff\xd8\xff"));
    let response = app.oneshot(process_image_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["code"], "MISSING_FIELD");
    assert_eq!(json["error"], "No address provided");

    // Rejection was also recorded to the datastore
    let errors = store.errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(store.detections.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_timestamp_is_rejected() {
    let store = Arc::new(MemoryStore::default());
    let app = app(vec![], vec![], store.clone());

    let body = multipart_body(Some("not-a-date"), Some("MG Road"), Some(b"\xff\xd8\xff"));
    let response = app.oneshot(process_image_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["code"], "INVALID_TIMESTAMP");
}

#[tokio::test]
async fn test_detector_failure_maps_to_bad_gateway() {
    let store = Arc::new(MemoryStore::default());
    let app = router(AppState {
        vehicle_detector: Arc::new(StubDetector {
            detections: vec![],
            fail: true,
        }),
        helmet_detector: Arc::new(StubDetector {
            detections: vec![],
            fail: false,
        }),
        store: store.clone(),
        config: Arc::new(ServerConfig::default()),
    });

    let body = multipart_body(
        Some("2024-07-26T10:00:00Z"),
        Some("MG Road"),
        Some(b"\xff\xd8\xff"),
    );
    let response = app.oneshot(process_image_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = json_body(response).await;
    assert_eq!(json["code"], "INFERENCE_FAILED");

    let errors = store.errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].address.as_deref(), Some("MG Road"));
}

#[tokio::test]
async fn test_persistence_failure_maps_to_internal_error() {
    let store = Arc::new(MemoryStore {
        fail_detections: true,
        ..Default::default()
    });
    let app = app(
        vec![detection("motorcycle", (100.0, 100.0, 200.0, 200.0))],
        vec![],
        store.clone(),
    );

    let body = multipart_body(
        Some("2024-07-26T10:00:00Z"),
        Some("MG Road"),
        Some(b"\xff\xd8\xff"),
    );
    let response = app.oneshot(process_image_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = json_body(response).await;
    assert_eq!(json["code"], "PERSISTENCE_FAILED");
    assert_eq!(store.errors.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_two_riders_one_without_helmet() {
    let store = Arc::new(MemoryStore::default());
    let app = app(
        vec![
            detection("motorcycle", (100.0, 100.0, 200.0, 200.0)),
            detection("motorcycle", (300.0, 300.0, 400.0, 400.0)),
        ],
        vec![detection("helmet", (120.0, 50.0, 180.0, 90.0))],
        store.clone(),
    );

    let body = multipart_body(
        Some("2024-07-26T10:00:00Z"),
        Some("MG Road"),
        Some(b"\xff\xd8\xff"),
    );
    let response = app.oneshot(process_image_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["count_helmet"], 1);
    assert_eq!(json["count_no_helmet"], 1);
}
