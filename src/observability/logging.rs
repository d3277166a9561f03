//! Structured logging.
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies to the
//! proxy and its HTTP tracing layer.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// Returns an error if a subscriber is already installed.
pub fn init(log_level: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

fn default_directives(log_level: &str) -> String {
    format!("module_proxy={log_level},proxy_cli={log_level},tower_http={log_level}")
}
