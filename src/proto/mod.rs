//! Wire types for the `pipestream.module.PipeStepProcessor` service.
//!
//! The messages are declared directly with prost derives; the client and
//! server stubs are generated by `build.rs` and included below.

use std::collections::HashMap;

/// A document flowing through a pipeline step.
///
/// Only the four fields below are decoded. Fields a backend adds beyond
/// them are dropped by prost, so a document passes through unchanged only
/// when it has exactly this shape.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PipeDoc {
    #[prost(string, tag = "1")]
    pub doc_id: String,
    #[prost(string, tag = "2")]
    pub title: String,
    #[prost(string, tag = "3")]
    pub body: String,
    #[prost(map = "string, string", tag = "4")]
    pub fields: HashMap<String, String>,
}

/// Where a document came from and which step is handling it.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProcessMetadata {
    #[prost(string, tag = "1")]
    pub index_name: String,
    #[prost(string, tag = "2")]
    pub collection_name: String,
    #[prost(string, tag = "3")]
    pub pipe_step_name: String,
    #[prost(string, tag = "4")]
    pub stream_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ModuleProcessRequest {
    #[prost(message, optional, tag = "1")]
    pub document: Option<PipeDoc>,
    #[prost(message, optional, tag = "2")]
    pub metadata: Option<ProcessMetadata>,
}

impl ModuleProcessRequest {
    /// Document id used in log lines.
    pub fn doc_id(&self) -> &str {
        self.document
            .as_ref()
            .map(|doc| doc.doc_id.as_str())
            .unwrap_or("no-document")
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ModuleProcessResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
    /// Present only when `success` is true.
    #[prost(message, optional, tag = "2")]
    pub output_doc: Option<PipeDoc>,
    #[prost(string, repeated, tag = "3")]
    pub processor_logs: Vec<String>,
}

impl ModuleProcessResponse {
    /// An unsuccessful response carrying a single log line.
    pub fn failure(log_line: impl Into<String>) -> Self {
        Self {
            success: false,
            output_doc: None,
            processor_logs: vec![log_line.into()],
        }
    }
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct RegistrationRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServiceRegistrationMetadata {
    #[prost(string, tag = "1")]
    pub module_name: String,
    #[prost(string, tag = "2")]
    pub version: String,
    #[prost(bool, tag = "3")]
    pub health_check_passed: bool,
    #[prost(string, tag = "4")]
    pub health_check_message: String,
    /// JSON schema describing the module's configuration.
    #[prost(string, tag = "5")]
    pub json_config_schema: String,
    #[prost(map = "string, string", tag = "6")]
    pub metadata: HashMap<String, String>,
}

include!(concat!(
    env!("OUT_DIR"),
    "/pipestream.module.PipeStepProcessor.rs"
));

pub use pipe_step_processor_client::PipeStepProcessorClient;
pub use pipe_step_processor_server::{PipeStepProcessor, PipeStepProcessorServer};
