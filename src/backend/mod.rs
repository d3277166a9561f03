//! Backend module access.
//!
//! # Data Flow
//! ```text
//! RequestForwarder / HealthProbe
//!     → ModuleBackend (one call, no retry)
//!     → connection.rs (lazy shared channel, created once per generation)
//!     → backend module over plaintext gRPC
//! ```

use async_trait::async_trait;

use crate::error::BackendError;
use crate::proto::{
    ModuleProcessRequest, ModuleProcessResponse, RegistrationRequest, ServiceRegistrationMetadata,
};

pub mod connection;

pub use connection::{ConnectionId, ConnectionManager};

/// The three calls the proxy forwards to a backend module.
#[async_trait]
pub trait ModuleBackend: Send + Sync {
    async fn process_data(
        &self,
        request: ModuleProcessRequest,
    ) -> Result<ModuleProcessResponse, BackendError>;

    async fn test_process_data(
        &self,
        request: ModuleProcessRequest,
    ) -> Result<ModuleProcessResponse, BackendError>;

    async fn get_service_registration(
        &self,
        request: RegistrationRequest,
    ) -> Result<ServiceRegistrationMetadata, BackendError>;
}
