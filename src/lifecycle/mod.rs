//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → AppContext (context.rs) → dependencies ready
//!     → pipeline → listener
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT or Shutdown::trigger
//!     → stop accepting → drain in-flight requests → exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then dependencies, then listeners
//! - No ambient globals: handlers reach setup state through AppContext

pub mod context;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use context::AppContext;
pub use shutdown::Shutdown;
pub use startup::{Application, StartupError};
