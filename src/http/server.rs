//! HTTP server setup.
//!
//! # Responsibilities
//! - Turn the pipeline into an Axum service
//! - Serve it on an already-bound listener
//! - Stop accepting on shutdown and drain in-flight requests

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;

use crate::http::pipeline::Pipeline;

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(pipeline: Pipeline) -> Self {
        tracing::debug!(bindings = pipeline.table().len(), "Route table frozen");
        Self {
            router: pipeline.into_router(),
        }
    }

    /// Run the server until `shutdown` resolves, then drain connections.
    pub async fn run<S>(self, listener: TcpListener, shutdown: S) -> Result<(), std::io::Error>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
