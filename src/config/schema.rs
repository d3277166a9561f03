//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the module proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// gRPC listener the proxy serves on.
    pub listener: ListenerConfig,

    /// The backend module requests are forwarded to.
    pub backend: BackendConfig,

    /// Backend connectivity probe settings.
    pub health_check: HealthCheckConfig,

    /// Logging, metrics and the ops HTTP surface.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:9090").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Backend module address.
///
/// Plaintext only: the backend lives in the same host or pod as the proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    pub host: String,

    pub port: u16,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl BackendConfig {
    /// Endpoint URI for the backend channel.
    pub fn uri(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 9091,
            connect_timeout_secs: 5,
        }
    }
}

/// Health probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Upper bound on the probe's describe call, in seconds.
    pub timeout_secs: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self { timeout_secs: 5 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Install the Prometheus recorder and serve `/metrics`.
    pub metrics_enabled: bool,

    /// Bind address of the ops HTTP server (health and metrics).
    pub ops_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            ops_address: "0.0.0.0:8080".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config: ProxyConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:9090");
        assert_eq!(config.backend.uri(), "http://localhost:9091");
        assert_eq!(config.health_check.timeout_secs, 5);
        assert!(config.observability.metrics_enabled);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [backend]
            host = "echo-service"

            [observability]
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.host, "echo-service");
        assert_eq!(config.backend.port, 9091);
        assert_eq!(config.observability.log_level, "debug");
        assert_eq!(config.observability.ops_address, "0.0.0.0:8080");
    }
}
