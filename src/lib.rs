//! gRPC sidecar proxy for pipeline step modules.
//!
//! Forwards `PipeStepProcessor` calls to a backend module and adds metrics,
//! structured logging and a backend connectivity probe.

pub mod backend;
pub mod config;
pub mod error;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod ops;
pub mod proto;
pub mod rpc;

pub use backend::{ConnectionManager, ModuleBackend};
pub use config::ProxyConfig;
pub use error::BackendError;
pub use health::{HealthProbe, HealthStatus};
pub use lifecycle::Shutdown;
pub use observability::ProxyMetrics;
pub use rpc::{GrpcServer, RequestForwarder};
