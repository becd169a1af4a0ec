//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config, overridable via `RUST_LOG`

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive: the configured level for this crate,
/// `info` for the HTTP middleware.
pub fn default_directive(log_level: &str) -> String {
    format!("gateway={log_level},tower_http=info")
}

/// Install the global subscriber. `RUST_LOG` wins over `log_level`.
///
/// Returns `false` when a subscriber was already installed (tests install
/// their own).
pub fn init(log_level: &str) -> bool {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middleware_stays_at_info() {
        assert_eq!(default_directive("debug"), "gateway=debug,tower_http=info");
        assert_eq!(default_directive("warn"), "gateway=warn,tower_http=info");
    }
}
