//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Local client
//!     → listener.rs (Unix socket, world read/write)
//!     → Hand off to HTTP layer
//!
//! HTTP layer (upstream client)
//!     → connector.rs (dial the fixed privileged socket)
//!     → Privileged engine API
//! ```
//!
//! # Design Decisions
//! - Both sides are Unix sockets; there is no TCP or TLS surface
//! - The upstream destination is fixed at startup and never taken from the
//!   request

pub mod connector;
pub mod listener;

pub use connector::{UnixConnection, UnixConnector};
pub use listener::{bind_unix_listener, ListenerError};
