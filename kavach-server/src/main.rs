// Kavach helmet-compliance detection server

use std::sync::Arc;

use tokio::signal;
use tracing::info;

use kavach_eye::RemoteDetector;
use kavach_server::store::SupabaseStore;
use kavach_server::{router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    info!("Starting kavach-server...");

    let config = ServerConfig::from_env();
    config.validate().map_err(anyhow::Error::msg)?;

    let vehicle_detector = RemoteDetector::new(
        config.inference_url.clone(),
        config.detection.vehicle_model.clone(),
    );
    let helmet_detector = RemoteDetector::new(
        config.inference_url.clone(),
        config.detection.helmet_model.clone(),
    );
    info!(
        vehicle_model = vehicle_detector.model_name(),
        helmet_model = helmet_detector.model_name(),
        "Detection collaborators ready"
    );

    let store = SupabaseStore::new(
        config.database_url.clone(),
        config.database_key.clone(),
        config.detection_table.clone(),
        config.error_table.clone(),
    );
    info!("Datastore client ready");

    let state = AppState {
        vehicle_detector: Arc::new(vehicle_detector),
        helmet_detector: Arc::new(helmet_detector),
        store: Arc::new(store),
        config: Arc::new(config.clone()),
    };

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("Received shutdown signal");
}
