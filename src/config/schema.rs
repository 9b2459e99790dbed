//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default location of the listening socket.
pub const DEFAULT_LISTEN_SOCKET: &str = "/tmp/docker-proxy-acl/docker.sock";

/// Default location of the privileged engine socket.
pub const DEFAULT_UPSTREAM_SOCKET: &str = "/var/run/docker.sock";

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Allowed category names (e.g. "containers", "ping").
    pub allow: Vec<String>,

    /// Listening socket settings.
    pub listener: ListenerConfig,

    /// Privileged upstream socket settings.
    pub upstream: UpstreamConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Filesystem path of the listening Unix socket.
    pub socket_path: PathBuf,

    /// Permission bits applied to the socket file after bind.
    pub socket_mode: u32,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_LISTEN_SOCKET),
            socket_mode: 0o666,
        }
    }
}

/// Upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Filesystem path of the privileged API socket.
    pub socket_path: PathBuf,

    /// Bound on the whole upstream round trip, body included.
    pub timeout_secs: u64,

    /// Largest upstream body the gateway will buffer.
    pub max_response_bytes: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_UPSTREAM_SOCKET),
            timeout_secs: 30,
            max_response_bytes: 64 * 1024 * 1024,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Prometheus scrape endpoint (e.g. "127.0.0.1:9090"). Disabled when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_address: None,
        }
    }
}
