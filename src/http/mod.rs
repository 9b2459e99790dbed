//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Unix socket connection
//!     → server.rs (Axum setup, request ID, spans)
//!     → [routing decides: allowed category or 404]
//!     → server.rs (GET-only gate, 400 otherwise)
//!     → upstream.rs (GET over the privileged socket, buffered)
//!     → response.rs (relay status/content type/body, or 502/504)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod upstream;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
pub use upstream::{forward_target, UpstreamClient, UpstreamError, UpstreamResponse};
