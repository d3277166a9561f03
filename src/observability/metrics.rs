//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_processed` (counter): backend reported success
//! - `proxy_requests_failed` (counter): backend reported failure or the call failed
//! - `proxy_processing_time_seconds` (histogram): duration of every `ProcessData` call
//! - `proxy_backend_up` (gauge): last probe result, 1=up, 0=down
//!
//! Only the primary processing path touches the request series; test
//! processing and registration calls are not counted.
//!
//! # Design Decisions
//! - Handles are registered once and held by `ProxyMetrics`, so updates are
//!   atomic increments with no registry lookup
//! - The Prometheus recorder is installed globally by the binary; tests
//!   build handles against a local recorder instead

use std::time::Duration;

use metrics::{describe_counter, describe_gauge, describe_histogram, Counter, Gauge, Histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

pub const REQUESTS_PROCESSED: &str = "proxy_requests_processed";
pub const REQUESTS_FAILED: &str = "proxy_requests_failed";
pub const PROCESSING_TIME: &str = "proxy_processing_time_seconds";
pub const BACKEND_UP: &str = "proxy_backend_up";

/// Install the global Prometheus recorder.
///
/// Must run before any [`ProxyMetrics`] is created, otherwise those handles
/// stay bound to the no-op recorder.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::info!("Prometheus recorder installed");
    Ok(handle)
}

/// Counters and timer owned by the request forwarder.
#[derive(Clone)]
pub struct ProxyMetrics {
    processed: Counter,
    failed: Counter,
    processing_time: Histogram,
    backend_up: Gauge,
}

impl ProxyMetrics {
    /// Register the proxy series with the current recorder.
    pub fn new() -> Self {
        describe_counter!(
            REQUESTS_PROCESSED,
            "Number of requests processed by the proxy"
        );
        describe_counter!(REQUESTS_FAILED, "Number of requests that failed processing");
        describe_histogram!(
            PROCESSING_TIME,
            metrics::Unit::Seconds,
            "Time taken to process requests through the proxy"
        );
        describe_gauge!(BACKEND_UP, "Backend connectivity (1=up, 0=down)");

        Self {
            processed: metrics::counter!(REQUESTS_PROCESSED),
            failed: metrics::counter!(REQUESTS_FAILED),
            processing_time: metrics::histogram!(PROCESSING_TIME),
            backend_up: metrics::gauge!(BACKEND_UP),
        }
    }

    pub fn record_processed(&self) {
        self.processed.increment(1);
    }

    pub fn record_failed(&self) {
        self.failed.increment(1);
    }

    pub fn record_processing_time(&self, elapsed: Duration) {
        self.processing_time.record(elapsed.as_secs_f64());
    }

    pub fn record_backend_up(&self, up: bool) {
        self.backend_up.set(if up { 1.0 } else { 0.0 });
    }
}

impl Default for ProxyMetrics {
    fn default() -> Self {
        Self::new()
    }
}
