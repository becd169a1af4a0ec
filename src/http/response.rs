//! Response handling.
//!
//! # Responsibilities
//! - Guard the send primitive: first send wins, later sends are no-ops
//! - Build the structured failure envelope (400, 404, 408, 413, 500)
//!
//! # Design Decisions
//! - One `Responder` per request, never shared across requests
//! - A discarded send is not an error and is not logged
//! - `success` in the failure envelope is the string `"false"`, kept for
//!   compatibility with existing clients

use std::sync::{Arc, Mutex, PoisonError};

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Result of [`Responder::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// This call produced the request's response.
    Sent,
    /// A response was already sent; this one was discarded.
    AlreadySent,
}

impl SendOutcome {
    pub fn is_sent(self) -> bool {
        matches!(self, Self::Sent)
    }
}

enum Slot {
    Empty,
    Pending(Response),
    Delivered,
}

/// Per-request, send-once response handle.
///
/// Cloning yields another handle to the same slot, so work spawned by a
/// handler can still answer the request.
#[derive(Clone)]
pub struct Responder {
    slot: Arc<Mutex<Slot>>,
}

impl Responder {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::Empty)),
        }
    }

    /// Send `response` if nothing has been sent for this request yet.
    pub fn send(&self, response: impl IntoResponse) -> SendOutcome {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        match *slot {
            Slot::Empty => {
                *slot = Slot::Pending(response.into_response());
                SendOutcome::Sent
            }
            Slot::Pending(_) | Slot::Delivered => SendOutcome::AlreadySent,
        }
    }

    /// Send a JSON body with `status`.
    pub fn json<T: Serialize>(&self, status: StatusCode, body: T) -> SendOutcome {
        self.send((status, Json(body)))
    }

    /// `302 Found` to `location`.
    pub fn redirect(&self, location: &str) -> SendOutcome {
        self.send((StatusCode::FOUND, [(header::LOCATION, location.to_string())]))
    }

    /// Status-only response with an empty body.
    pub fn status(&self, status: StatusCode) -> SendOutcome {
        self.send(status)
    }

    pub fn is_sent(&self) -> bool {
        !matches!(
            *self.slot.lock().unwrap_or_else(PoisonError::into_inner),
            Slot::Empty
        )
    }

    /// Hand the sent response to the transport. Later sends stay no-ops.
    pub(crate) fn take(&self) -> Option<Response> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        match std::mem::replace(&mut *slot, Slot::Delivered) {
            Slot::Pending(response) => Some(response),
            Slot::Empty => {
                *slot = Slot::Empty;
                None
            }
            Slot::Delivered => None,
        }
    }
}

impl Default for Responder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Responder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Responder").field("sent", &self.is_sent()).finish()
    }
}

// ── Failure envelope ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct Failure<'a> {
    success: &'static str,
    message: &'a str,
    error: FailureDetail<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FailureDetail<'a> {
    status_code: u16,
    message: &'a str,
}

/// `{"success":"false","message":..,"error":{"statusCode":..,"message":..}}`
pub fn failure(status: StatusCode, message: &str, detail: &str) -> Response {
    let body = Failure {
        success: "false",
        message,
        error: FailureDetail {
            status_code: status.as_u16(),
            message: detail,
        },
    };
    (status, Json(body)).into_response()
}

/// The catch-all response for unmatched routes.
pub fn not_found() -> Response {
    failure(
        StatusCode::NOT_FOUND,
        "Page not found",
        "You reached a route that is not defined on this server",
    )
}

/// Sent when a request outlives `timeouts.request_secs`.
pub fn request_timeout() -> Response {
    failure(
        StatusCode::REQUEST_TIMEOUT,
        "Request timeout",
        "The server did not finish processing this request in time",
    )
}

pub fn internal_error() -> Response {
    failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error",
        "The server failed to process this request",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn not_found_body_is_exact() {
        let response = not_found();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            r#"{"success":"false","message":"Page not found","error":{"statusCode":404,"message":"You reached a route that is not defined on this server"}}"#
        );
    }

    #[tokio::test]
    async fn only_first_send_is_kept() {
        let res = Responder::new();
        assert_eq!(res.send("OTP sent"), SendOutcome::Sent);
        assert_eq!(res.json(StatusCode::CREATED, serde_json::json!({"ok": true})), SendOutcome::AlreadySent);
        assert!(res.is_sent());

        let response = res.take().unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OTP sent");
    }

    #[test]
    fn sends_after_delivery_are_discarded() {
        let res = Responder::new();
        let spawned = res.clone();
        res.status(StatusCode::NO_CONTENT);
        assert!(res.take().is_some());
        assert_eq!(spawned.redirect("/docs"), SendOutcome::AlreadySent);
        assert!(res.take().is_none());
    }

    #[test]
    fn take_before_send_leaves_slot_open() {
        let res = Responder::new();
        assert!(res.take().is_none());
        assert!(!res.is_sent());
        assert!(res.send(StatusCode::ACCEPTED).is_sent());
    }
}
