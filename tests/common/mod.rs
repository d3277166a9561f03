//! Shared utilities for integration tests: an echo backend module and a
//! fully wired proxy, both served on loopback ephemeral ports.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::{Channel, Server};
use tonic::{Request, Response, Status};

use module_proxy::config::BackendConfig;
use module_proxy::ops::{self, OpsState};
use module_proxy::proto::{
    ModuleProcessRequest, ModuleProcessResponse, PipeStepProcessor, PipeStepProcessorClient,
    PipeStepProcessorServer, RegistrationRequest, ServiceRegistrationMetadata,
};
use module_proxy::{
    ConnectionManager, GrpcServer, HealthProbe, ModuleBackend, ProxyMetrics, RequestForwarder,
    Shutdown,
};

/// Backend module that echoes documents back.
///
/// Documents whose id starts with `reject-` are answered with `success=false`.
pub struct EchoModule;

impl EchoModule {
    fn answer(request: ModuleProcessRequest, label: &str) -> ModuleProcessResponse {
        let doc_id = request
            .document
            .as_ref()
            .map(|d| d.doc_id.clone())
            .unwrap_or_default();

        if doc_id.starts_with("reject-") {
            return ModuleProcessResponse {
                success: false,
                output_doc: None,
                processor_logs: vec![format!("echo: rejected {doc_id}")],
            };
        }

        ModuleProcessResponse {
            success: true,
            output_doc: request.document,
            processor_logs: vec![format!("echo: {label} {doc_id}")],
        }
    }
}

#[tonic::async_trait]
impl PipeStepProcessor for EchoModule {
    async fn process_data(
        &self,
        request: Request<ModuleProcessRequest>,
    ) -> Result<Response<ModuleProcessResponse>, Status> {
        Ok(Response::new(Self::answer(
            request.into_inner(),
            "processed",
        )))
    }

    async fn test_process_data(
        &self,
        request: Request<ModuleProcessRequest>,
    ) -> Result<Response<ModuleProcessResponse>, Status> {
        Ok(Response::new(Self::answer(
            request.into_inner(),
            "test processed",
        )))
    }

    async fn get_service_registration(
        &self,
        _request: Request<RegistrationRequest>,
    ) -> Result<Response<ServiceRegistrationMetadata>, Status> {
        Ok(Response::new(echo_registration()))
    }
}

/// What the echo backend reports about itself.
pub fn echo_registration() -> ServiceRegistrationMetadata {
    ServiceRegistrationMetadata {
        module_name: "echo-service".into(),
        version: "2.1".into(),
        health_check_passed: true,
        health_check_message: "Module is healthy".into(),
        json_config_schema: r#"{"type":"object","properties":{"test":true}}"#.into(),
        metadata: HashMap::from([
            ("proxy_enabled".to_string(), "true".to_string()),
            ("k".to_string(), "v".to_string()),
        ]),
    }
}

/// Start the echo backend and return its address.
pub async fn start_echo_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        Server::builder()
            .add_service(PipeStepProcessorServer::new(EchoModule))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    addr
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// A running proxy wired exactly like the binary.
pub struct ProxyHarness {
    pub grpc_addr: SocketAddr,
    pub ops_addr: SocketAddr,
    pub connections: Arc<ConnectionManager>,
    pub prometheus: PrometheusHandle,
    pub shutdown: Shutdown,
}

impl ProxyHarness {
    pub async fn client(&self) -> PipeStepProcessorClient<Channel> {
        PipeStepProcessorClient::connect(format!("http://{}", self.grpc_addr))
            .await
            .expect("proxy unreachable")
    }

    pub fn http(&self) -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    pub fn ops_url(&self, path: &str) -> String {
        format!("http://{}{}", self.ops_addr, path)
    }
}

/// Start a proxy in front of `backend`.
pub async fn start_proxy(backend: SocketAddr) -> ProxyHarness {
    start_proxy_with(backend, true).await
}

/// Start a proxy in front of `backend`, with or without a `/metrics` endpoint.
///
/// The harness keeps its recorder handle either way so counters stay readable.
pub async fn start_proxy_with(backend: SocketAddr, metrics_enabled: bool) -> ProxyHarness {
    let recorder = PrometheusBuilder::new().build_recorder();
    let prometheus = recorder.handle();
    let proxy_metrics = metrics::with_local_recorder(&recorder, ProxyMetrics::new);

    let connections = Arc::new(ConnectionManager::new(BackendConfig {
        host: backend.ip().to_string(),
        port: backend.port(),
        connect_timeout_secs: 1,
    }));
    let module: Arc<dyn ModuleBackend> = connections.clone();
    let forwarder = Arc::new(RequestForwarder::new(
        module.clone(),
        proxy_metrics.clone(),
    ));
    let probe = Arc::new(HealthProbe::new(
        module,
        Duration::from_secs(5),
        proxy_metrics,
    ));

    let grpc_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let ops_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let grpc_addr = grpc_listener.local_addr().unwrap();
    let ops_addr = ops_listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    tokio::spawn(
        GrpcServer::new(forwarder).run(grpc_listener, shutdown.subscribe()),
    );
    tokio::spawn(ops::serve(
        ops_listener,
        OpsState {
            probe,
            prometheus: metrics_enabled.then(|| prometheus.clone()),
        },
        shutdown.subscribe(),
    ));

    ProxyHarness {
        grpc_addr,
        ops_addr,
        connections,
        prometheus,
        shutdown,
    }
}

/// Value of the first sample named `name` (or `name_total`).
pub fn sample(handle: &PrometheusHandle, name: &str) -> f64 {
    let total = format!("{name}_total");
    handle
        .render()
        .lines()
        .filter(|line| !line.starts_with('#'))
        .find_map(|line| {
            let mut parts = line.split_whitespace();
            let series = parts.next()?;
            if series == name || series == total {
                parts.last().and_then(|v| v.parse().ok())
            } else {
                None
            }
        })
        .unwrap_or(0.0)
}
