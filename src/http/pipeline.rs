//! The request pipeline.
//!
//! # Stage order
//! ```text
//! request id → trace span (ingress) → CORS
//!     → deadline               (408 envelope when `request_secs` runs out)
//!     → body decoding          (413 / 400 on failure)
//!     → static assets          (images dir at /images, public dir at /)
//!     → response guard         (one Responder per request)
//!     → route bindings         (registration order, first sender wins)
//!     → error hook             (report, 500 if nothing was sent)
//!     → catch-all              (fixed 404 envelope)
//! trace egress: status + latency logged, metrics recorded
//! ```
//!
//! A stage either forwards the request, augments it (decoded body), or
//! produces the response and ends the pipeline for that request.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, Response as HttpResponse};
use axum::response::Response;
use axum::Router;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::http::assets::StaticMount;
use crate::http::middleware::{body, cors_layer};
use crate::http::request::{ApiRequest, MakeRequestUuid, RequestParts, X_REQUEST_ID};
use crate::config::LimitsConfig;
use crate::http::response::{internal_error, not_found, request_timeout, Responder};
use crate::lifecycle::AppContext;
use crate::observability::{metrics, tracing as trace_hooks, ErrorEvent};
use crate::routing::RouteTable;

/// The assembled pipeline. Cheap to clone; everything is shared.
#[derive(Debug, Clone)]
pub struct Pipeline {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    context: AppContext,
    table: Arc<RouteTable>,
    static_mounts: Vec<StaticMount>,
    limits: LimitsConfig,
    request_timeout: Duration,
}

impl Pipeline {
    /// Freeze `table` and wire the stages from the context's configuration.
    pub fn new(context: AppContext, table: RouteTable) -> Self {
        let config = context.config();
        // Most specific mount first, so `/images/*` never resolves into the
        // public directory.
        let static_mounts = vec![
            StaticMount::new("/images", &config.assets.images_dir),
            StaticMount::new("/", &config.assets.public_dir),
        ];
        let limits = config.limits.clone();
        let request_timeout = Duration::from_secs(config.timeouts.request_secs);

        Self {
            inner: Arc::new(Inner {
                context,
                table: Arc::new(table),
                static_mounts,
                limits,
                request_timeout,
            }),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.inner.table
    }

    pub fn context(&self) -> &AppContext {
        &self.inner.context
    }

    /// Wrap the stages in the cross-cutting layers and return the service.
    pub fn into_router(self) -> Router {
        let cors = cors_layer(&self.inner.context.config().cors);

        let trace = TraceLayer::new_for_http()
            .make_span_with(trace_hooks::request_span)
            .on_response(|response: &HttpResponse<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis() as u64,
                    "Request completed"
                );
            });

        Router::new()
            .fallback(dispatch)
            .with_state(self)
            .layer(cors)
            .layer(trace)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run one request through the stages and produce its response.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let started = Instant::now();
        let method = request.method().clone();
        let (response, stage) =
            match tokio::time::timeout(self.inner.request_timeout, self.run_stages(request)).await {
                Ok(done) => done,
                Err(_) => {
                    tracing::warn!(timeout = ?self.inner.request_timeout, "Request timed out");
                    (request_timeout(), "timeout")
                }
            };
        metrics::record_request(method.as_str(), response.status().as_u16(), stage, started);
        response
    }

    async fn run_stages(&self, request: Request<Body>) -> (Response, &'static str) {
        let (parts, stream) = request.into_parts();

        // Body decoding
        let limit = body::limit_for(&parts.headers, &self.inner.limits);
        let raw_body = match body::read_body(&parts.headers, stream, limit).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(error = %e, "Rejecting request body");
                return (e.into_response(), "body");
            }
        };
        let decoded = match body::decode(&parts.headers, &raw_body) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::debug!(error = %e, "Rejecting request body");
                return (e.into_response(), "body");
            }
        };

        // Static assets
        for mount in &self.inner.static_mounts {
            if let Some(response) = mount.serve(&parts).await {
                return (response, "static");
            }
        }

        let request_id = parts
            .headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        let query: Vec<(String, String)> = parts
            .uri
            .query()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();
        let method = parts.method;
        let path = parts.uri.path().to_string();

        let request = ApiRequest::new(
            RequestParts {
                request_id: request_id.clone(),
                method: method.clone(),
                path: path.clone(),
                headers: parts.headers,
                query,
                body: decoded,
                raw_body,
            },
            self.inner.context.clone(),
            Arc::clone(&self.inner.table),
        );

        // Response guard: one responder for the whole request.
        let responder = Responder::new();

        // Route bindings, in registration order.
        for candidate in self.inner.table.candidates(&method, &path) {
            let group = candidate.binding.group.name();
            let handler_request = request.for_match(candidate.relative_path, candidate.params);
            let result = candidate.handler.call(handler_request, responder.clone()).await;

            match result {
                Ok(()) => {
                    if let Some(response) = responder.take() {
                        return (response, "route");
                    }
                    tracing::trace!(group, "Binding passed the request on");
                }
                Err(error) => {
                    // Error hook
                    let response_sent = responder.is_sent();
                    self.inner.context.reporter().report(&ErrorEvent {
                        request_id: &request_id,
                        method: &method,
                        path: &path,
                        group,
                        error: &error,
                        response_sent,
                    });
                    metrics::record_handler_error(group);
                    return (responder.take().unwrap_or_else(internal_error), "error");
                }
            }
        }

        // Catch-all
        (not_found(), "not_found")
    }
}

async fn dispatch(State(pipeline): State<Pipeline>, request: Request<Body>) -> Response {
    pipeline.handle(request).await
}
