//! module-proxy
//!
//! A sidecar that sits in front of a pipeline step module and serves the
//! same gRPC contract.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                MODULE PROXY                  │
//!   gRPC caller        │  ┌────────────┐    ┌──────────────────┐      │
//!   ───────────────────┼─▶│ rpc server │───▶│ RequestForwarder │      │
//!                      │  └────────────┘    └────────┬─────────┘      │
//!                      │                             │ metrics, logs  │
//!                      │                             ▼                │
//!                      │                   ┌───────────────────┐      │
//!                      │                   │ ConnectionManager │──────┼──▶ backend module
//!                      │                   └─────────▲─────────┘      │
//!                      │                             │                │
//!   orchestrator       │  ┌────────────┐    ┌────────┴────────┐       │
//!   ───────────────────┼─▶│ ops server │───▶│   HealthProbe   │       │
//!   /health /metrics   │  └────────────┘    └─────────────────┘       │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use module_proxy::config::load_config;
use module_proxy::lifecycle::{signals::wait_for_signal, supervise};
use module_proxy::observability::{logging, metrics};
use module_proxy::ops::{self, OpsState};
use module_proxy::{
    ConnectionManager, GrpcServer, HealthProbe, ModuleBackend, ProxyMetrics, RequestForwarder,
    Shutdown,
};

#[derive(Parser)]
#[command(name = "module-proxy", version)]
#[command(about = "gRPC sidecar proxy for pipeline step modules", long_about = None)]
struct Args {
    /// Path to a TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init(&config.observability.log_level)?;
    tracing::info!("module-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.uri(),
        ops_address = %config.observability.ops_address,
        "Configuration loaded"
    );

    // The recorder must exist before any metric handle is registered.
    let prometheus = if config.observability.metrics_enabled {
        Some(metrics::init_metrics()?)
    } else {
        None
    };
    let proxy_metrics = ProxyMetrics::new();

    let connections = Arc::new(ConnectionManager::new(config.backend.clone()));
    let backend: Arc<dyn ModuleBackend> = connections.clone();
    let forwarder = Arc::new(RequestForwarder::new(
        backend.clone(),
        proxy_metrics.clone(),
    ));
    let probe = Arc::new(HealthProbe::new(
        backend,
        Duration::from_secs(config.health_check.timeout_secs),
        proxy_metrics,
    ));

    let grpc_listener = TcpListener::bind(&config.listener.bind_address).await?;
    let ops_listener = TcpListener::bind(&config.observability.ops_address).await?;

    let shutdown = Shutdown::new();

    let ops_task = tokio::spawn(ops::serve(
        ops_listener,
        OpsState { probe, prometheus },
        shutdown.subscribe(),
    ));
    let grpc_task = tokio::spawn(
        GrpcServer::new(forwarder).run(grpc_listener, shutdown.subscribe()),
    );

    let cause = supervise(&shutdown, wait_for_signal(), grpc_task, ops_task).await;
    tracing::info!(cause = ?cause, "Servers stopped");

    connections.shutdown().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
