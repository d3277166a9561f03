//! gRPC server setup.
//!
//! # Responsibilities
//! - Register the forwarder as the `PipeStepProcessor` service
//! - Serve on an already-bound listener
//! - Stop accepting and drain in-flight calls on shutdown

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;

use crate::proto::PipeStepProcessorServer;
use crate::rpc::RequestForwarder;

/// gRPC front end of the proxy.
pub struct GrpcServer {
    forwarder: Arc<RequestForwarder>,
}

impl GrpcServer {
    pub fn new(forwarder: Arc<RequestForwarder>) -> Self {
        Self { forwarder }
    }

    /// Serve until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), tonic::transport::Error> {
        let address = listener.local_addr().ok();
        tracing::info!(address = ?address, "gRPC server starting");

        Server::builder()
            .add_service(PipeStepProcessorServer::from_arc(self.forwarder))
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async move {
                let _ = shutdown.recv().await;
                tracing::info!("gRPC server received shutdown signal");
            })
            .await?;

        tracing::info!("gRPC server stopped");
        Ok(())
    }
}
