//! Body-decoding stage.
//!
//! Buffers the request body and decodes URL-encoded and JSON payloads.
//! JSON is strict: the top level must be an object or an array. Parsed
//! types are held to `max_body_bytes`; anything else (uploads, plain
//! text) is buffered raw up to `max_raw_body_bytes`.

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Response;
use serde_json::{Map, Value};

use crate::config::LimitsConfig;
use crate::http::request::RequestBody;
use crate::http::response::failure;

/// Why the body could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("malformed JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON body must be an object or an array")]
    NotStrict,
}

impl BodyError {
    /// The failure envelope the client receives.
    pub fn into_response(self) -> Response {
        match self {
            Self::TooLarge { .. } => failure(
                StatusCode::PAYLOAD_TOO_LARGE,
                "Payload too large",
                &self.to_string(),
            ),
            Self::Json(_) | Self::NotStrict => {
                failure(StatusCode::BAD_REQUEST, "Bad request", &self.to_string())
            }
        }
    }
}

/// How the decoding stage treats a content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Raw,
}

fn kind(headers: &HeaderMap) -> BodyKind {
    let mime = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(essence)
        .unwrap_or_default();

    if mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json")) {
        BodyKind::Json
    } else if mime == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else {
        BodyKind::Raw
    }
}

/// The buffering limit for a request with these headers.
pub fn limit_for(headers: &HeaderMap, limits: &LimitsConfig) -> usize {
    match kind(headers) {
        BodyKind::Json | BodyKind::Form => limits.max_body_bytes,
        BodyKind::Raw => limits.max_raw_body_bytes,
    }
}

/// Buffer `body`, refusing anything above `limit` bytes.
pub async fn read_body(headers: &HeaderMap, body: Body, limit: usize) -> Result<Bytes, BodyError> {
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared.is_some_and(|len| len > limit) {
        return Err(BodyError::TooLarge { limit });
    }

    // Streamed bodies without a length can still overflow the limit; a
    // failed read is reported the same way.
    axum::body::to_bytes(body, limit)
        .await
        .map_err(|_| BodyError::TooLarge { limit })
}

/// Decode `raw` according to its content type.
pub fn decode(headers: &HeaderMap, raw: &Bytes) -> Result<RequestBody, BodyError> {
    if raw.is_empty() {
        return Ok(RequestBody::Empty);
    }

    match kind(headers) {
        BodyKind::Json => {
            let value: Value = serde_json::from_slice(raw)?;
            match value {
                Value::Object(_) | Value::Array(_) => Ok(RequestBody::Json(value)),
                _ => Err(BodyError::NotStrict),
            }
        }
        BodyKind::Form => Ok(RequestBody::Form(decode_form(raw))),
        BodyKind::Raw => Ok(RequestBody::Raw(raw.clone())),
    }
}

/// Parse `a=1&b=2&a=3` into `{"a": ["1", "3"], "b": "2"}`.
pub fn decode_form(raw: &[u8]) -> Map<String, Value> {
    let mut map = Map::new();
    for (key, value) in url::form_urlencoded::parse(raw) {
        let value = Value::String(value.into_owned());
        match map.get_mut(key.as_ref()) {
            None => {
                map.insert(key.into_owned(), value);
            }
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        }
    }
    map
}

/// `"Application/JSON; charset=utf-8"` → `"application/json"`.
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
