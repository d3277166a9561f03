//! Ops HTTP surface: health and Prometheus metrics.
//!
//! ```text
//! GET /health/ready  → 200 UP / 503 DOWN (backend-connectivity)
//! GET /health/live   → 200 UP
//! GET /metrics       → Prometheus text, 404 when metrics are disabled
//! ```

pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use self::handlers::*;
use crate::health::HealthProbe;

/// State injected into ops handlers.
#[derive(Clone)]
pub struct OpsState {
    pub probe: Arc<HealthProbe>,
    pub prometheus: Option<PrometheusHandle>,
}

pub fn setup_ops_router(state: OpsState) -> Router {
    Router::new()
        .route("/health/ready", get(get_ready))
        .route("/health/live", get(get_live))
        .route("/metrics", get(get_metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve the ops router until the shutdown signal fires.
pub async fn serve(
    listener: TcpListener,
    state: OpsState,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    tracing::info!(address = ?listener.local_addr().ok(), "Ops server starting");

    axum::serve(listener, setup_ops_router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;

    tracing::info!("Ops server stopped");
    Ok(())
}
