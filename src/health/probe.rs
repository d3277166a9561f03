//! Backend connectivity probe.
//!
//! Issues a registration call through the shared connection and maps the
//! outcome to UP/DOWN within a fixed deadline.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;

use crate::backend::ModuleBackend;
use crate::health::state::{HealthCheck, HealthReport, HealthStatus, BACKEND_CHECK_NAME};
use crate::observability::ProxyMetrics;
use crate::proto::RegistrationRequest;

pub struct HealthProbe {
    backend: Arc<dyn ModuleBackend>,
    timeout: Duration,
    metrics: ProxyMetrics,
}

impl HealthProbe {
    pub fn new(backend: Arc<dyn ModuleBackend>, timeout: Duration, metrics: ProxyMetrics) -> Self {
        Self {
            backend,
            timeout,
            metrics,
        }
    }

    /// Probe the backend. Never fails: errors and timeouts are `Down`.
    pub async fn check_ready(&self) -> HealthStatus {
        let call = self.backend.get_service_registration(RegistrationRequest {});

        let status = match time::timeout(self.timeout, call).await {
            Ok(Ok(_)) => HealthStatus::Up,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Health check failed: backend error");
                HealthStatus::Down
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "Health check failed: timeout");
                HealthStatus::Down
            }
        };

        self.metrics.record_backend_up(status.is_up());
        status
    }

    /// Probe the backend and wrap the result in a readiness report.
    pub async fn report(&self) -> HealthReport {
        let status = self.check_ready().await;
        HealthReport::from_checks(vec![HealthCheck {
            name: BACKEND_CHECK_NAME,
            status,
        }])
    }
}
