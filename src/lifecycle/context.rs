//! Application context.
//!
//! Everything handlers may need from process setup (configuration,
//! dependency probes, the error reporter) is built once during startup and
//! handed to the pipeline here, instead of living in globals.

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::health::probe::is_srv_scheme;
use crate::health::{Dependency, DependencyError, TcpProbe};
use crate::observability::{ErrorReporter, TracingReporter};

#[derive(Debug)]
struct Inner {
    config: AppConfig,
    dependencies: Vec<Arc<dyn Dependency>>,
    reporter: Arc<dyn ErrorReporter>,
}

/// Immutable, cheaply cloneable application context.
#[derive(Debug, Clone)]
pub struct AppContext {
    inner: Arc<Inner>,
}

impl AppContext {
    /// Context with the default tracing-backed error reporter.
    pub fn new(config: AppConfig, dependencies: Vec<Arc<dyn Dependency>>) -> Self {
        let reporter = Arc::new(TracingReporter::new(
            config.observability.error_tracing_dsn.clone(),
        ));
        Self::with_reporter(config, dependencies, reporter)
    }

    pub fn with_reporter(
        config: AppConfig,
        dependencies: Vec<Arc<dyn Dependency>>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                dependencies,
                reporter,
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Dependencies in startup order (database first, then queue).
    pub fn dependencies(&self) -> &[Arc<dyn Dependency>] {
        &self.inner.dependencies
    }

    pub fn reporter(&self) -> &dyn ErrorReporter {
        self.inner.reporter.as_ref()
    }
}

/// TCP probes for the configured database and queue, in that order.
///
/// SRV connection strings (`mongodb+srv://`) are skipped with a warning:
/// their host is a DNS record, and the driver resolves the real servers.
pub fn configured_dependencies(config: &AppConfig) -> Result<Vec<Arc<dyn Dependency>>, DependencyError> {
    let timeout = Duration::from_secs(config.timeouts.probe_timeout_secs);
    let mut dependencies: Vec<Arc<dyn Dependency>> = Vec::new();

    for (name, url) in [
        ("database", config.dependencies.database_url.as_deref()),
        ("queue", config.dependencies.queue_url.as_deref()),
    ] {
        match url {
            Some(url) if uses_srv(url) => tracing::warn!(
                dependency = name,
                "SRV connection string, skipping readiness check"
            ),
            Some(url) => dependencies.push(Arc::new(TcpProbe::from_url(name, url, timeout)?)),
            None => tracing::warn!(dependency = name, "No URL configured, skipping readiness check"),
        }
    }

    Ok(dependencies)
}

fn uses_srv(endpoint: &str) -> bool {
    url::Url::parse(endpoint).is_ok_and(|parsed| is_srv_scheme(parsed.scheme()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependencies_follow_startup_order() {
        let mut config = AppConfig::default();
        config.dependencies.queue_url = Some("amqp://mq".into());
        config.dependencies.database_url = Some("mongodb://db".into());

        let deps = configured_dependencies(&config).unwrap();
        let names: Vec<_> = deps.iter().map(|d| d.name().to_string()).collect();
        assert_eq!(names, vec!["database", "queue"]);
    }

    #[test]
    fn srv_database_is_not_probed() {
        let mut config = AppConfig::default();
        config.dependencies.database_url = Some("mongodb+srv://cluster0.x.mongodb.net/app".into());
        config.dependencies.queue_url = Some("amqp://mq".into());

        let deps = configured_dependencies(&config).unwrap();
        let names: Vec<_> = deps.iter().map(|d| d.name().to_string()).collect();
        assert_eq!(names, vec!["queue"]);
    }

    #[test]
    fn unset_urls_register_nothing() {
        assert!(configured_dependencies(&AppConfig::default()).unwrap().is_empty());
    }
}
