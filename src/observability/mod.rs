//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pipeline boundaries produce:
//!     → tracing.rs (ingress span, egress log, error reports)
//!     → metrics.rs (counters, histograms)
//!     → logging.rs (subscriber, filters)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//!     → Error-tracing endpoint (via ErrorReporter)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every span and report
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use self::tracing::{ErrorEvent, ErrorReporter, TracingReporter};
