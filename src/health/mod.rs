//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! GET /health/ready
//!     → probe.rs (describe call, 5s deadline)
//!     → state.rs (UP / DOWN, readiness report)
//!     → proxy_backend_up gauge
//! ```
//!
//! # Design Decisions
//! - Probing is on demand; there is no background loop
//! - Any error or timeout is DOWN; the probe never fails
//! - Data-path calls are never bounded by the probe's deadline

pub mod probe;
pub mod state;

pub use probe::HealthProbe;
pub use state::{HealthCheck, HealthReport, HealthStatus, BACKEND_CHECK_NAME};
