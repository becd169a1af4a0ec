//! Built-in route groups.
//!
//! Business groups (customer, payment, OTP, messaging, reminders, ...)
//! are mounted by the embedding application through
//! [`RouteTable::mount`] and [`RouteTable::merge`]; the observed mount
//! points are `/customer`, `/email`, `/register`, `/login`,
//! `/notifications` and `/schedule`, the rest merge at the root.

pub mod docs;
pub mod health;

use crate::http::{ApiRequest, Responder};
use crate::routing::{HandlerResult, RouteGroup, RouteTable};

/// `GET /` always answers with a redirect to the documentation.
pub fn root_redirect() -> RouteGroup {
    RouteGroup::new("root-redirect").get("/", redirect_to_docs)
}

async fn redirect_to_docs(_req: ApiRequest, res: Responder) -> HandlerResult {
    res.redirect("/docs");
    Ok(())
}

/// The gateway's own bindings, in precedence order. Further groups are
/// appended after these.
pub fn default_table() -> RouteTable {
    RouteTable::new()
        .merge(root_redirect())
        .merge(docs::group())
        .merge(health::group())
}
