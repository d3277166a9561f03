use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::health::{HealthReport, HealthStatus};
use crate::ops::OpsState;

/// Readiness: probes the backend on every request.
pub async fn get_ready(State(state): State<OpsState>) -> (StatusCode, Json<HealthReport>) {
    let report = state.probe.report().await;
    let status = match report.status {
        HealthStatus::Up => StatusCode::OK,
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(report))
}

/// Liveness: the process is serving.
pub async fn get_live() -> Json<HealthReport> {
    Json(HealthReport::from_checks(Vec::new()))
}

pub async fn get_metrics(State(state): State<OpsState>) -> Response {
    match &state.prometheus {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics disabled").into_response(),
    }
}
