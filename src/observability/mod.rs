//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarder and health probe produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histogram, gauge)
//!
//! Consumers:
//!     → stdout log collector
//!     → ops server `/metrics` (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;

pub use self::metrics::ProxyMetrics;
