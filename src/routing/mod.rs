//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     RouteGroup::new(..).get(..).post(..)   (handlers per group)
//!     → RouteTable::mount(prefix, group) / merge(group)
//!     → frozen, shared via Arc
//!
//! Per request (pipeline routing stage):
//!     (method, path)
//!     → matcher.rs (does the mount accept the path? remainder)
//!     → router.rs (does the group have a route? handler + params)
//!     → candidates yielded in registration order
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching + radix tree)
//! - Deterministic: same input always yields the same candidates
//! - First registered wins; later bindings only run when earlier ones pass

pub mod handler;
pub mod matcher;
pub mod router;

pub use handler::{Handler, HandlerError, HandlerResult};
pub use matcher::MountMatcher;
pub use router::{BindingInfo, RouteBinding, RouteGroup, RouteMatch, RouteTable};
