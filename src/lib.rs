//! Allowlist gateway for the container engine socket.
//!
//! Listens on a Unix socket, lets through only GET requests whose path belongs
//! to an operator-selected category, and forwards them to the privileged
//! engine socket.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{AllowedSet, Category};
