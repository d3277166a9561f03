//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Validation is a pure
//! function that reports every problem, not just the first.

use std::net::SocketAddr;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("backend.host must not be empty")]
    EmptyBackendHost,

    #[error("backend.port must be non-zero")]
    ZeroBackendPort,

    #[error("backend.connect_timeout_secs must be greater than zero")]
    ZeroConnectTimeout,

    #[error("health_check.timeout_secs must be greater than zero")]
    ZeroHealthTimeout,

    #[error("{field} is not a host:port address: {value}")]
    InvalidAddress { field: &'static str, value: String },
}

/// Check a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.backend.host.trim().is_empty() {
        errors.push(ValidationError::EmptyBackendHost);
    }
    if config.backend.port == 0 {
        errors.push(ValidationError::ZeroBackendPort);
    }
    if config.backend.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroConnectTimeout);
    }
    if config.health_check.timeout_secs == 0 {
        errors.push(ValidationError::ZeroHealthTimeout);
    }

    check_address(
        &mut errors,
        "listener.bind_address",
        &config.listener.bind_address,
    );
    check_address(
        &mut errors,
        "observability.ops_address",
        &config.observability.ops_address,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Accepts `ip:port`, `[ipv6]:port` or `hostname:port`; hostnames are
/// resolved when the listener binds.
fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if !is_listen_address(value) {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn is_listen_address(value: &str) -> bool {
    if value.parse::<SocketAddr>().is_ok() {
        return true;
    }
    match value.rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty()
                && !host.contains(|c: char| c.is_whitespace() || c == ':')
                && port.parse::<u16>().is_ok()
        }
        None => false,
    }
}
