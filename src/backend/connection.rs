//! Backend connection lifecycle.
//!
//! # Responsibilities
//! - Create the backend channel lazily on first use
//! - Hand out clients bound to the one shared channel
//! - Recreate the channel after it has been closed
//! - Close the channel at process teardown
//!
//! The channel is built behind an async mutex, so concurrent first calls
//! create exactly one connection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tonic::transport::{Channel, Endpoint};

use crate::backend::ModuleBackend;
use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::proto::{
    ModuleProcessRequest, ModuleProcessResponse, PipeStepProcessorClient, RegistrationRequest,
    ServiceRegistrationMetadata,
};

/// Global atomic counter for connection IDs.
/// Relaxed ordering is enough: IDs only need to be unique.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a backend channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn next() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[derive(Debug)]
struct BackendConnection {
    id: ConnectionId,
    channel: Channel,
}

/// Owns the single logical connection to the backend module.
#[derive(Debug)]
pub struct ConnectionManager {
    config: BackendConfig,
    current: Mutex<Option<BackendConnection>>,
    created: AtomicU64,
}

impl ConnectionManager {
    /// Create a manager for the configured backend. No connection is made.
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            current: Mutex::new(None),
            created: AtomicU64::new(0),
        }
    }

    /// Backend endpoint URI.
    pub fn address(&self) -> String {
        self.config.uri()
    }

    /// Return a client bound to the shared channel, creating the channel
    /// if there is none.
    pub async fn get_client(&self) -> Result<PipeStepProcessorClient<Channel>, BackendError> {
        let mut current = self.current.lock().await;

        if let Some(connection) = current.as_ref() {
            return Ok(PipeStepProcessorClient::new(connection.channel.clone()));
        }

        let connection = self.connect()?;
        let client = PipeStepProcessorClient::new(connection.channel.clone());
        *current = Some(connection);
        Ok(client)
    }

    /// ID of the live channel, if one exists.
    pub async fn connection_id(&self) -> Option<ConnectionId> {
        self.current.lock().await.as_ref().map(|c| c.id)
    }

    /// Number of channels created over this manager's lifetime.
    pub fn connections_created(&self) -> u64 {
        self.created.load(Ordering::SeqCst)
    }

    /// Close the shared channel. Safe to call more than once.
    ///
    /// In-flight calls keep their own channel clone and finish; the
    /// underlying connection goes away once the last clone is dropped.
    pub async fn shutdown(&self) {
        match self.current.lock().await.take() {
            Some(connection) => {
                tracing::info!(
                    connection_id = %connection.id,
                    address = %self.address(),
                    "Backend channel closed"
                );
            }
            None => tracing::debug!("Backend channel already closed"),
        }
    }

    fn connect(&self) -> Result<BackendConnection, BackendError> {
        let address = self.address();
        let endpoint = Endpoint::from_shared(address.clone())
            .map_err(|source| BackendError::InvalidAddress {
                address: address.clone(),
                source,
            })?
            .connect_timeout(Duration::from_secs(self.config.connect_timeout_secs));

        let channel = endpoint.connect_lazy();
        let id = ConnectionId::next();
        self.created.fetch_add(1, Ordering::SeqCst);

        tracing::info!(connection_id = %id, address = %address, "Backend channel created");
        Ok(BackendConnection { id, channel })
    }
}

#[async_trait]
impl ModuleBackend for ConnectionManager {
    async fn process_data(
        &self,
        request: ModuleProcessRequest,
    ) -> Result<ModuleProcessResponse, BackendError> {
        let mut client = self.get_client().await?;
        Ok(client.process_data(request).await?.into_inner())
    }

    async fn test_process_data(
        &self,
        request: ModuleProcessRequest,
    ) -> Result<ModuleProcessResponse, BackendError> {
        let mut client = self.get_client().await?;
        Ok(client.test_process_data(request).await?.into_inner())
    }

    async fn get_service_registration(
        &self,
        request: RegistrationRequest,
    ) -> Result<ServiceRegistrationMetadata, BackendError> {
        let mut client = self.get_client().await?;
        Ok(client.get_service_registration(request).await?.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn manager() -> ConnectionManager {
        ConnectionManager::new(BackendConfig {
            host: "127.0.0.1".into(),
            port: 9,
            connect_timeout_secs: 1,
        })
    }

    #[test]
    fn connection_id_unique() {
        let id1 = ConnectionId::next();
        let id2 = ConnectionId::next();
        assert_ne!(id1, id2);
        assert_eq!(id2.to_string(), format!("conn-{}", id2.as_u64()));
    }

    #[tokio::test]
    async fn nothing_is_created_before_first_use() {
        let manager = manager();
        assert_eq!(manager.connection_id().await, None);
        assert_eq!(manager.connections_created(), 0);
    }

    #[tokio::test]
    async fn channel_is_reused_across_calls() {
        let manager = manager();
        manager.get_client().await.unwrap();
        let first = manager.connection_id().await;
        manager.get_client().await.unwrap();

        assert!(first.is_some());
        assert_eq!(manager.connection_id().await, first);
        assert_eq!(manager.connections_created(), 1);
    }

    #[tokio::test]
    async fn concurrent_first_use_creates_one_channel() {
        let manager = Arc::new(manager());

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.get_client().await.is_ok() })
            })
            .collect();

        for task in tasks {
            assert!(task.await.unwrap());
        }
        assert_eq!(manager.connections_created(), 1);
    }

    #[tokio::test]
    async fn shutdown_closes_and_next_use_recreates() {
        let manager = manager();
        manager.get_client().await.unwrap();
        let first = manager.connection_id().await.unwrap();

        manager.shutdown().await;
        assert_eq!(manager.connection_id().await, None);
        manager.shutdown().await;

        manager.get_client().await.unwrap();
        let second = manager.connection_id().await.unwrap();
        assert_ne!(first, second);
        assert_eq!(manager.connections_created(), 2);
    }

    #[tokio::test]
    async fn malformed_host_is_an_address_error() {
        let manager = ConnectionManager::new(BackendConfig {
            host: "bad host".into(),
            ..BackendConfig::default()
        });

        let err = manager.get_client().await.unwrap_err();
        assert!(matches!(err, BackendError::InvalidAddress { .. }));
        assert!(err.failure_message().contains("http://bad host:9091"));
        assert_eq!(manager.connection_id().await, None);
    }
}
