//! Request forwarding to the backend module.
//!
//! # Responsibilities
//! - Forward ProcessData, TestProcessData and GetServiceRegistration
//! - Count processed/failed requests and time ProcessData
//! - Replace backend failures with well-formed negative responses
//! - Stamp the proxy's identity on registration metadata
//!
//! Every operation returns a value; backend errors never reach the caller.

use std::sync::Arc;
use std::time::Instant;

use tonic::{Request, Response, Status};

use crate::backend::ModuleBackend;
use crate::observability::ProxyMetrics;
use crate::proto::{
    ModuleProcessRequest, ModuleProcessResponse, PipeStepProcessor, RegistrationRequest,
    ServiceRegistrationMetadata,
};

/// Module name reported in place of the backend's.
pub const PROXY_MODULE_NAME: &str = "proxy-module";

/// Version reported when the backend could not be described.
pub const FALLBACK_VERSION: &str = "1.0.0";

pub struct RequestForwarder {
    backend: Arc<dyn ModuleBackend>,
    metrics: ProxyMetrics,
}

impl RequestForwarder {
    pub fn new(backend: Arc<dyn ModuleBackend>, metrics: ProxyMetrics) -> Self {
        Self { backend, metrics }
    }

    /// Forward a processing request, updating the request counters and timer.
    pub async fn process(&self, request: ModuleProcessRequest) -> ModuleProcessResponse {
        let started = Instant::now();
        let doc_id = request.doc_id().to_string();
        tracing::debug!(doc_id = %doc_id, "Forwarding process request");

        let result = self.backend.process_data(request).await;

        let response = match result {
            Ok(response) if response.success => {
                self.metrics.record_processed();
                tracing::debug!(doc_id = %doc_id, "Successfully processed document");
                response
            }
            Ok(response) => {
                self.metrics.record_failed();
                tracing::warn!(doc_id = %doc_id, "Failed to process document");
                response
            }
            Err(e) => {
                self.metrics.record_failed();
                tracing::error!(doc_id = %doc_id, error = ?e, "Error processing document");
                ModuleProcessResponse::failure(format!("Proxy error: {}", e.failure_message()))
            }
        };

        self.metrics.record_processing_time(started.elapsed());
        response
    }

    /// Forward a test-processing request. Not counted or timed.
    pub async fn test_process(&self, request: ModuleProcessRequest) -> ModuleProcessResponse {
        tracing::debug!(doc_id = %request.doc_id(), "Forwarding test process request");

        match self.backend.test_process_data(request).await {
            Ok(response) => {
                tracing::debug!(success = response.success, "Test processing completed");
                response
            }
            Err(e) => {
                tracing::error!(error = ?e, "Error in test processing");
                ModuleProcessResponse::failure(format!(
                    "Proxy error in test processing: {}",
                    e.failure_message()
                ))
            }
        }
    }

    /// Describe the backend under the proxy's name.
    pub async fn describe_service(
        &self,
        request: RegistrationRequest,
    ) -> ServiceRegistrationMetadata {
        tracing::debug!("Forwarding service registration request");

        match self.backend.get_service_registration(request).await {
            Ok(registration) => {
                tracing::debug!(
                    backend_module = %registration.module_name,
                    version = %registration.version,
                    "Backend described itself"
                );
                ServiceRegistrationMetadata {
                    module_name: PROXY_MODULE_NAME.to_string(),
                    ..registration
                }
            }
            Err(e) => {
                tracing::error!(error = ?e, "Error getting service registration");
                ServiceRegistrationMetadata {
                    module_name: PROXY_MODULE_NAME.to_string(),
                    version: FALLBACK_VERSION.to_string(),
                    ..Default::default()
                }
            }
        }
    }
}

#[tonic::async_trait]
impl PipeStepProcessor for RequestForwarder {
    async fn process_data(
        &self,
        request: Request<ModuleProcessRequest>,
    ) -> Result<Response<ModuleProcessResponse>, Status> {
        Ok(Response::new(self.process(request.into_inner()).await))
    }

    async fn test_process_data(
        &self,
        request: Request<ModuleProcessRequest>,
    ) -> Result<Response<ModuleProcessResponse>, Status> {
        Ok(Response::new(self.test_process(request.into_inner()).await))
    }

    async fn get_service_registration(
        &self,
        request: Request<RegistrationRequest>,
    ) -> Result<Response<ServiceRegistrationMetadata>, Status> {
        Ok(Response::new(
            self.describe_service(request.into_inner()).await,
        ))
    }
}
