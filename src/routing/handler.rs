//! Handler trait and type erasure.
//!
//! Route groups hold handlers of different concrete types, so each one is
//! boxed behind [`ErasedHandler`]:
//!
//! ```text
//! async fn show(req: ApiRequest, res: Responder) -> HandlerResult { … }
//!        ↓ group.get("/{id}", show)
//! show.into_boxed_handler()                  ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(show))                  ← stored as BoxedHandler
//!        ↓
//! handler.call(req, res) at request time     ← one vtable dispatch
//! ```

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::http::request::ApiRequest;
use crate::http::response::Responder;

/// Failure raised by a route handler. Surfaced to the error hook.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("{0}")]
    Message(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl HandlerError {
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// What every handler returns. `Ok(())` without a send passes the request
/// on to the next matching binding.
pub type HandlerResult = Result<(), HandlerError>;

#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: ApiRequest, res: Responder) -> BoxFuture<'static, HandlerResult>;
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Implemented for every valid route handler:
///
/// ```text
/// async fn name(req: ApiRequest, res: Responder) -> HandlerResult
/// ```
///
/// Sealed: only the blanket impl below satisfies it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut> private::Sealed for F
where
    F: Fn(ApiRequest, Responder) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
}

impl<F, Fut> Handler for F
where
    F: Fn(ApiRequest, Responder) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

struct FnHandler<F>(F);

impl<F, Fut> ErasedHandler for FnHandler<F>
where
    F: Fn(ApiRequest, Responder) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, req: ApiRequest, res: Responder) -> BoxFuture<'static, HandlerResult> {
        (self.0)(req, res).boxed()
    }
}
