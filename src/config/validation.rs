//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Resolve category names against the registry
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function producing the immutable allowed set

use std::net::SocketAddr;

use crate::config::schema::GatewayConfig;
use crate::routing::{AllowedSet, Category};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("need at least 1 allowed category (-a): [{}]", Category::known_names())]
    NoCategories,

    #[error("unknown category '{0}', expected one of: [{known}]", known = Category::known_names())]
    UnknownCategory(String),

    #[error("{0} socket path must not be empty")]
    EmptySocketPath(&'static str),

    #[error("listening and upstream socket paths must differ")]
    SameSocketPath,

    #[error("upstream timeout must be greater than zero")]
    ZeroTimeout,

    #[error("upstream max_response_bytes must be greater than zero")]
    ZeroResponseLimit,

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),
}

/// Check the configuration and resolve the allowed categories.
pub fn validate_config(config: &GatewayConfig) -> Result<AllowedSet, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let allowed = match AllowedSet::parse(&config.allow) {
        Ok(set) => {
            if set.is_empty() {
                errors.push(ValidationError::NoCategories);
            }
            set
        }
        Err(unknown) => {
            errors.extend(
                unknown
                    .into_iter()
                    .map(|u| ValidationError::UnknownCategory(u.0)),
            );
            AllowedSet::default()
        }
    };

    let listen = &config.listener.socket_path;
    let upstream = &config.upstream.socket_path;
    if listen.as_os_str().is_empty() {
        errors.push(ValidationError::EmptySocketPath("listening"));
    }
    if upstream.as_os_str().is_empty() {
        errors.push(ValidationError::EmptySocketPath("upstream"));
    }
    if !listen.as_os_str().is_empty() && listen == upstream {
        errors.push(ValidationError::SameSocketPath);
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.upstream.max_response_bytes == 0 {
        errors.push(ValidationError::ZeroResponseLimit);
    }

    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::MetricsAddress(addr.clone()));
        }
    }

    if errors.is_empty() {
        Ok(allowed)
    } else {
        Err(errors)
    }
}
