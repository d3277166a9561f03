//! Supervision of the two server tasks.
//!
//! The proxy runs until a shutdown signal arrives or either server exits on
//! its own. Whichever comes first, both servers are told to stop and are
//! awaited before returning.

use std::fmt::Display;
use std::future::Future;

use tokio::task::{JoinError, JoinHandle};

use crate::lifecycle::Shutdown;

/// What ended the serving phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCause {
    Signal,
    GrpcStopped,
    OpsStopped,
}

/// Wait for `signal` or for either server to exit, then shut both down.
pub async fn supervise<G, O>(
    shutdown: &Shutdown,
    signal: impl Future<Output = ()>,
    mut grpc: JoinHandle<Result<(), G>>,
    mut ops: JoinHandle<Result<(), O>>,
) -> ExitCause
where
    G: Display,
    O: Display,
{
    let cause = tokio::select! {
        _ = signal => ExitCause::Signal,
        result = &mut grpc => {
            tracing::warn!("gRPC server exited; shutting down");
            report("gRPC server", result);
            ExitCause::GrpcStopped
        }
        result = &mut ops => {
            tracing::warn!("Ops server exited; shutting down");
            report("Ops server", result);
            ExitCause::OpsStopped
        }
    };

    shutdown.trigger();

    if cause != ExitCause::GrpcStopped {
        report("gRPC server", grpc.await);
    }
    if cause != ExitCause::OpsStopped {
        report("Ops server", ops.await);
    }

    cause
}

fn report<E: Display>(server: &str, result: Result<Result<(), E>, JoinError>) {
    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "{server} failed"),
        Err(e) => tracing::error!(error = %e, "{server} task panicked"),
    }
}
