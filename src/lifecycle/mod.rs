//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse config → Validate → Init logging/metrics → Build router
//!     → Bind listener → Serve
//!
//! Shutdown:
//!     SIGINT/SIGTERM (signals.rs) → Shutdown::trigger (shutdown.rs)
//!     → Stop accepting, close listener → Remove socket file → Exit 0
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)
//! - Shutdown is immediate; in-flight requests are not drained

pub mod shutdown;
pub mod signals;

pub use shutdown::{remove_socket_file, Shutdown};
pub use signals::TerminationSignals;
