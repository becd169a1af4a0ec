//! Request tracing and error reporting.
//!
//! # Responsibilities
//! - Create one span per request (ingress hook)
//! - Log status and latency per response (egress hook)
//! - Report handler failures (error hook)
//!
//! # Design Decisions
//! - Hooks observe the pipeline boundaries; they never rewrite responses
//! - The error-tracing endpoint is an external collaborator behind
//!   [`ErrorReporter`]; the default reporter emits `tracing` events

use std::fmt;

use axum::body::Body;
use axum::http::{Method, Request};
use tracing::Span;

use crate::http::request::X_REQUEST_ID;
use crate::routing::HandlerError;

/// Ingress hook: the span every request runs inside.
pub fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    tracing::info_span!(
        "request",
        id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
    )
}

/// Everything the error hook knows about a failed request.
#[derive(Debug)]
pub struct ErrorEvent<'a> {
    pub request_id: &'a str,
    pub method: &'a Method,
    pub path: &'a str,
    pub group: &'a str,
    pub error: &'a HandlerError,
    /// Whether the handler had already sent a response before failing.
    pub response_sent: bool,
}

/// Sink for handler failures.
pub trait ErrorReporter: Send + Sync + fmt::Debug {
    fn report(&self, event: &ErrorEvent<'_>);
}

/// Reports failures as `tracing` error events.
#[derive(Debug, Clone, Default)]
pub struct TracingReporter {
    dsn: Option<String>,
}

impl TracingReporter {
    pub fn new(dsn: Option<String>) -> Self {
        if dsn.is_none() {
            tracing::warn!("No error-tracing DSN configured, handler errors are only logged");
        }
        Self { dsn }
    }

    /// Endpoint identifier without credentials, safe to log.
    pub fn endpoint(&self) -> Option<String> {
        let dsn = self.dsn.as_deref()?;
        match url::Url::parse(dsn) {
            Ok(url) => Some(format!(
                "{}://{}{}",
                url.scheme(),
                url.host_str().unwrap_or_default(),
                url.path()
            )),
            Err(_) => Some("<unparseable>".to_string()),
        }
    }
}

impl ErrorReporter for TracingReporter {
    fn report(&self, event: &ErrorEvent<'_>) {
        let endpoint = self.endpoint();
        tracing::error!(
            request_id = %event.request_id,
            method = %event.method,
            path = %event.path,
            group = %event.group,
            response_sent = event.response_sent,
            endpoint = endpoint.as_deref().unwrap_or("none"),
            error = %event.error,
            "Handler failed"
        );
    }
}
