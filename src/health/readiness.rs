//! Dependency readiness: startup gating and the `/readyz` report.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use rand::Rng;
use serde::Serialize;

use crate::health::probe::{Dependency, DependencyError};

const RETRY_BASE_MS: u64 = 100;
const RETRY_MAX_MS: u64 = 2_000;

/// Result of probing one dependency.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyStatus {
    pub name: String,
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Probe every dependency concurrently.
pub async fn check_all(dependencies: &[Arc<dyn Dependency>]) -> Vec<DependencyStatus> {
    let checks = dependencies.iter().map(|dep| async move {
        let result = dep.check().await;
        DependencyStatus {
            name: dep.name().to_string(),
            ready: result.is_ok(),
            error: result.err().map(|e| e.to_string()),
        }
    });
    join_all(checks).await
}

/// Block until `dependency` answers, retrying with jittered exponential
/// backoff. Returns the last probe error once `deadline` has elapsed.
pub async fn wait_until_ready(
    dependency: &dyn Dependency,
    deadline: Duration,
) -> Result<(), DependencyError> {
    let started = Instant::now();
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match dependency.check().await {
            Ok(()) => {
                tracing::info!(dependency = dependency.name(), attempt, "Dependency ready");
                return Ok(());
            }
            Err(e) => {
                let delay = backoff(attempt);
                if started.elapsed() + delay >= deadline {
                    return Err(e);
                }
                tracing::warn!(
                    dependency = dependency.name(),
                    attempt,
                    delay = ?delay,
                    error = %e,
                    "Dependency not ready, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Exponential backoff capped at `RETRY_MAX_MS`, plus up to 10% jitter.
fn backoff(attempt: u32) -> Duration {
    let exp = 2u64.saturating_pow(attempt.saturating_sub(1));
    let capped = RETRY_BASE_MS.saturating_mul(exp).min(RETRY_MAX_MS);
    let jitter_range = capped / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };
    Duration::from_millis(capped + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::BoxFuture;
    use futures_util::FutureExt;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    struct Flaky {
        failures_left: AtomicU32,
    }

    impl Dependency for Flaky {
        fn name(&self) -> &str {
            "flaky"
        }

        fn check(&self) -> BoxFuture<'_, Result<(), DependencyError>> {
            async move {
                if self.failures_left.load(Ordering::SeqCst) == 0 {
                    return Ok(());
                }
                self.failures_left.fetch_sub(1, Ordering::SeqCst);
                Err(DependencyError::TimedOut {
                    name: "flaky".into(),
                    address: "nowhere:1".into(),
                    timeout: Duration::from_millis(1),
                })
            }
            .boxed()
        }
    }

    #[test]
    fn backoff_grows_and_caps() {
        assert!(backoff(1).as_millis() >= 100);
        assert!(backoff(2).as_millis() >= 200);
        let capped = backoff(20).as_millis();
        assert!((2_000..2_200).contains(&capped));
    }

    #[tokio::test]
    async fn retries_until_dependency_answers() {
        let dep = Flaky { failures_left: AtomicU32::new(2) };
        wait_until_ready(&dep, Duration::from_secs(5)).await.unwrap();
        assert_eq!(dep.failures_left.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn gives_up_after_deadline() {
        let dep = Flaky { failures_left: AtomicU32::new(u32::MAX) };
        let result = wait_until_ready(&dep, Duration::from_millis(250)).await;
        assert!(matches!(result, Err(DependencyError::TimedOut { .. })));
    }

    #[tokio::test]
    async fn check_all_reports_each_dependency() {
        let deps: Vec<Arc<dyn Dependency>> = vec![
            Arc::new(Flaky { failures_left: AtomicU32::new(0) }),
            Arc::new(Flaky { failures_left: AtomicU32::new(1) }),
        ];
        let statuses = check_all(&deps).await;
        assert!(statuses[0].ready);
        assert!(!statuses[1].ready);
        assert!(statuses[1].error.is_some());
    }
}
