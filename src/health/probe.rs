//! Dependency reachability probes.
//!
//! The database and the message queue are external collaborators. The
//! gateway does not speak their protocols; it only needs to know whether
//! they accept connections before it starts serving, and later for
//! `/readyz`.

use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::net::TcpStream;
use url::Url;

/// Error returned by a failed probe.
#[derive(Debug, thiserror::Error)]
pub enum DependencyError {
    #[error("{name}: invalid endpoint `{endpoint}`: {reason}")]
    InvalidEndpoint {
        name: String,
        endpoint: String,
        reason: String,
    },

    #[error("{name}: connect to {address} failed: {source}")]
    Unreachable {
        name: String,
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{name}: connect to {address} timed out after {timeout:?}")]
    TimedOut {
        name: String,
        address: String,
        timeout: Duration,
    },
}

/// An external collaborator the gateway depends on.
pub trait Dependency: Send + Sync + std::fmt::Debug {
    /// Name used in logs and readiness output.
    fn name(&self) -> &str;

    /// Resolve once the dependency is reachable, or fail.
    fn check(&self) -> BoxFuture<'_, Result<(), DependencyError>>;
}

/// Default ports for schemes `url` does not know about.
pub fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "mongodb" => Some(27017),
        "amqp" => Some(5672),
        "amqps" => Some(5671),
        "postgres" | "postgresql" => Some(5432),
        "mysql" => Some(3306),
        "redis" => Some(6379),
        "rediss" => Some(6380),
        _ => None,
    }
}

/// `mongodb+srv://` and similar: the host names a DNS SRV record that lists
/// the real servers, so it has no port of its own to connect to.
pub fn is_srv_scheme(scheme: &str) -> bool {
    scheme.ends_with("+srv")
}

/// Checks that a TCP connection to the endpoint's host and port succeeds.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    name: String,
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    /// Build a probe from a connection URL such as `amqp://mq:5672`.
    pub fn from_url(
        name: impl Into<String>,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Self, DependencyError> {
        let name = name.into();
        let invalid = |reason: String| DependencyError::InvalidEndpoint {
            name: name.clone(),
            endpoint: endpoint.to_string(),
            reason,
        };

        let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
        if is_srv_scheme(url.scheme()) {
            return Err(invalid("SRV records can not be probed over TCP".to_string()));
        }
        let host = url
            .host_str()
            .ok_or_else(|| invalid("missing host".to_string()))?
            .to_string();
        let port = url
            .port_or_known_default()
            .or_else(|| default_port(url.scheme()))
            .ok_or_else(|| invalid(format!("no port for scheme `{}`", url.scheme())))?;

        Ok(Self { name, host, port, timeout })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Dependency for TcpProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self) -> BoxFuture<'_, Result<(), DependencyError>> {
        async move {
            let address = self.address();
            match tokio::time::timeout(self.timeout, TcpStream::connect(address.as_str())).await {
                Ok(Ok(_stream)) => Ok(()),
                Ok(Err(source)) => Err(DependencyError::Unreachable {
                    name: self.name.clone(),
                    address,
                    source,
                }),
                Err(_) => Err(DependencyError::TimedOut {
                    name: self.name.clone(),
                    address,
                    timeout: self.timeout,
                }),
            }
        }
        .boxed()
    }
}
