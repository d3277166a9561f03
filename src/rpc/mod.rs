//! gRPC protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (tonic, PipeStepProcessor service)
//!     → forwarder.rs (metrics, logging, failure recovery)
//!     → backend::ConnectionManager
//!     → backend module
//! ```

pub mod forwarder;
pub mod server;

pub use forwarder::{RequestForwarder, FALLBACK_VERSION, PROXY_MODULE_NAME};
pub use server::GrpcServer;
