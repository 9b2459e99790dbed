//! Command-line and environment configuration.
//!
//! Every flag can also be supplied through an environment variable with the
//! `DOCKER_PROXY_ACL_` prefix. Flags and environment override the optional
//! config file, which overrides built-in defaults.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::{GatewayConfig, LogFormat};
use crate::config::validation::validate_config;
use crate::routing::AllowedSet;

#[derive(Debug, Parser)]
#[command(name = "docker-proxy-acl")]
#[command(version, about = "GET-only allowlist gateway for the container engine socket", long_about = None)]
pub struct Cli {
    /// Allowed category (repeatable or comma separated): containers, images,
    /// volumes, networks, services, tasks, events, version, info, ping
    #[arg(short = 'a', long = "allow", value_name = "CATEGORY", env = "DOCKER_PROXY_ACL_ALLOW", value_delimiter = ',')]
    pub allow: Vec<String>,

    /// Location of the listening socket file [default: /tmp/docker-proxy-acl/docker.sock]
    #[arg(long, value_name = "PATH", env = "DOCKER_PROXY_ACL_FILENAME")]
    pub filename: Option<PathBuf>,

    /// Location of the privileged engine socket [default: /var/run/docker.sock]
    #[arg(long, value_name = "PATH", env = "DOCKER_PROXY_ACL_UPSTREAM")]
    pub upstream: Option<PathBuf>,

    /// Upstream round-trip timeout in seconds [default: 30]
    #[arg(long, value_name = "SECS", env = "DOCKER_PROXY_ACL_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Optional TOML configuration file
    #[arg(short, long, value_name = "FILE", env = "DOCKER_PROXY_ACL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "DOCKER_PROXY_ACL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log line format
    #[arg(long, value_enum, env = "DOCKER_PROXY_ACL_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Serve Prometheus metrics on this TCP address
    #[arg(long, value_name = "ADDR", env = "DOCKER_PROXY_ACL_METRICS_ADDRESS")]
    pub metrics_address: Option<String>,
}

impl Cli {
    /// Build the effective configuration: defaults, then the config file,
    /// then flags and environment.
    pub fn into_config(self) -> Result<GatewayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GatewayConfig::default(),
        };

        for name in self.allow {
            if !config.allow.contains(&name) {
                config.allow.push(name);
            }
        }
        if let Some(path) = self.filename {
            config.listener.socket_path = path;
        }
        if let Some(path) = self.upstream {
            config.upstream.socket_path = path;
        }
        if let Some(secs) = self.timeout {
            config.upstream.timeout_secs = secs;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
        if self.metrics_address.is_some() {
            config.observability.metrics_address = self.metrics_address;
        }

        Ok(config)
    }

    /// Effective configuration plus the resolved allowed set.
    pub fn resolve(self) -> Result<(GatewayConfig, AllowedSet), ConfigError> {
        let config = self.into_config()?;
        let allowed = validate_config(&config).map_err(ConfigError::Validation)?;
        Ok((config, allowed))
    }
}
