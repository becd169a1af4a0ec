//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) as early as possible
//! - Hold the decoded request handed to route handlers
//!
//! # Design Decisions
//! - Request ID added before the tracing span is created
//! - Everything but the per-binding path match is shared behind an `Arc`,
//!   so passing a request on to the next binding is cheap
//! - Immutable once dispatch begins, apart from the decoded body

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderValue, Method, Request};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::lifecycle::AppContext;
use crate::routing::{HandlerError, RouteTable};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Assigns `x-request-id: <uuid v4>` to requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request body after the decoding stage.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body bytes were sent.
    Empty,
    /// `application/json` (or `+json`) body.
    Json(Value),
    /// `application/x-www-form-urlencoded` body. Repeated keys hold arrays.
    Form(Map<String, Value>),
    /// Any other content type, left undecoded.
    Raw(Bytes),
}

impl RequestBody {
    /// The decoded body as a JSON value. Empty and raw bodies read as `{}`.
    pub fn as_value(&self) -> Value {
        match self {
            Self::Json(value) => value.clone(),
            Self::Form(map) => Value::Object(map.clone()),
            Self::Empty | Self::Raw(_) => Value::Object(Map::new()),
        }
    }
}

#[derive(Debug)]
struct Shared {
    request_id: String,
    method: Method,
    path: String,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: RequestBody,
    raw_body: Bytes,
    context: AppContext,
    table: Arc<RouteTable>,
}

/// The request as seen by a route handler.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    shared: Arc<Shared>,
    relative_path: String,
    params: HashMap<String, String>,
}

/// Everything the pipeline collected before routing.
#[derive(Debug)]
pub struct RequestParts {
    pub request_id: String,
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub raw_body: Bytes,
}

impl ApiRequest {
    pub(crate) fn new(parts: RequestParts, context: AppContext, table: Arc<RouteTable>) -> Self {
        let relative_path = parts.path.clone();
        Self {
            shared: Arc::new(Shared {
                request_id: parts.request_id,
                method: parts.method,
                path: parts.path,
                headers: parts.headers,
                query: parts.query,
                body: parts.body,
                raw_body: parts.raw_body,
                context,
                table,
            }),
            relative_path,
            params: HashMap::new(),
        }
    }

    /// Same request, seen through a different binding's mount point.
    pub(crate) fn for_match(&self, relative_path: String, params: HashMap<String, String>) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            relative_path,
            params,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.shared.request_id
    }

    pub fn method(&self) -> &Method {
        &self.shared.method
    }

    /// Full request path, as received.
    pub fn path(&self) -> &str {
        &self.shared.path
    }

    /// Path relative to the mount point of the handling group.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.shared.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.shared.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Named path parameter: `/{id}` on `/42` gives `param("id") == Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// First value of a query-string parameter.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.shared
            .query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.shared.query
    }

    pub fn body(&self) -> &RequestBody {
        &self.shared.body
    }

    pub fn raw_body(&self) -> &Bytes {
        &self.shared.raw_body
    }

    /// Deserialize the decoded JSON or form body.
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        Ok(serde_json::from_value(self.shared.body.as_value())?)
    }

    pub fn context(&self) -> &AppContext {
        &self.shared.context
    }

    /// The binding table this request is being dispatched through.
    pub fn route_table(&self) -> &RouteTable {
        &self.shared.table
    }
}
