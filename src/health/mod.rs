//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (lifecycle::startup):
//!     For each configured dependency (database, queue)
//!     → probe.rs (TCP reachability, bounded by timeout)
//!     → retry until ready or startup deadline
//!
//! Readiness (GET /readyz):
//!     Probe every dependency concurrently
//!     → 200 when all pass, 503 listing failures otherwise
//! ```
//!
//! # Design Decisions
//! - Probes check reachability only; protocol clients live elsewhere
//! - Liveness has no dependencies: if the process answers, it is alive

pub mod probe;
pub mod readiness;

pub use probe::{Dependency, DependencyError, TcpProbe};
pub use readiness::{check_all, wait_until_ready, DependencyStatus};
