//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     AllowedSet × Category registry
//!     → category.rs (category name → path templates)
//!     → matcher.rs (compile templates)
//!     → router.rs (unversioned + versioned tables, frozen)
//!
//! Incoming Request (path)
//!     → router.rs (strip optional /vX.Y prefix, pick table)
//!     → matcher.rs (segment-wise template match)
//!     → Return: RouteMatch or NoMatch
//! ```
//!
//! # Design Decisions
//! - Categories are a closed enum; the exposed surface is auditable from
//!   `category.rs` alone
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path

pub mod category;
pub mod matcher;
pub mod router;

pub use category::{AllowedSet, Category, UnknownCategory};
pub use matcher::{ApiVersion, PathTemplate};
pub use router::{Route, RouteMatch, Router};
