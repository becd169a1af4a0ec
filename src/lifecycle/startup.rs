//! Startup orchestration.
//!
//! # Sequence
//! ```text
//! config (already loaded) → context (dependency probes, error reporter)
//!     → database reachable → queue reachable   (awaited, with retry)
//!     → metrics exporter (optional)
//!     → pipeline frozen → listener bound → serve
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, including a metrics exporter
//!   that was requested but could not be installed
//! - The error reporter does no I/O when built, so it is part of the
//!   context rather than a separate step
//! - Dependencies are awaited before binding; traffic only when ready
//! - Subsystems initialize in order, not concurrently

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::config::{AppConfig, ConfigError};
use crate::health::{wait_until_ready, DependencyError};
use crate::http::{HttpServer, Pipeline};
use crate::lifecycle::context::{configured_dependencies, AppContext};
use crate::observability::metrics;
use crate::routing::RouteTable;

/// Why the application could not start.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("dependency not ready: {0}")]
    Dependency(#[from] DependencyError),

    #[error("metrics exporter on {address}: {reason}")]
    Metrics { address: String, reason: String },

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// A fully started application: dependencies ready, listener bound.
pub struct Application {
    listener: TcpListener,
    local_addr: SocketAddr,
    server: HttpServer,
}

impl Application {
    /// Run the startup sequence with probes derived from `config`.
    pub async fn build(config: AppConfig, table: RouteTable) -> Result<Self, StartupError> {
        let dependencies = configured_dependencies(&config)?;
        Self::build_with_context(AppContext::new(config, dependencies), table).await
    }

    /// Run the startup sequence for a prepared context.
    pub async fn build_with_context(
        context: AppContext,
        table: RouteTable,
    ) -> Result<Self, StartupError> {
        let config = context.config();
        let deadline = Duration::from_secs(config.timeouts.startup_timeout_secs);

        for dependency in context.dependencies() {
            tracing::info!(dependency = dependency.name(), "Waiting for dependency");
            wait_until_ready(dependency.as_ref(), deadline).await?;
        }

        if config.observability.metrics_enabled {
            let address = &config.observability.metrics_address;
            let metrics_error = |reason: String| StartupError::Metrics {
                address: address.clone(),
                reason,
            };
            let addr = address
                .parse()
                .map_err(|e: std::net::AddrParseError| metrics_error(e.to_string()))?;
            metrics::init_metrics(addr).map_err(|e| metrics_error(e.to_string()))?;
        }

        let address = config.listener.bind_address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| StartupError::Bind { address: address.clone(), source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| StartupError::Bind { address, source })?;

        let pipeline = Pipeline::new(context, table);
        tracing::info!(
            address = %local_addr,
            bindings = pipeline.table().len(),
            "Application started"
        );

        Ok(Self {
            listener,
            local_addr,
            server: HttpServer::new(pipeline),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    /// Serve until `shutdown` resolves.
    pub async fn run_until_stopped<S>(self, shutdown: S) -> Result<(), StartupError>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        self.server
            .run(self.listener, shutdown)
            .await
            .map_err(StartupError::Serve)
    }
}
