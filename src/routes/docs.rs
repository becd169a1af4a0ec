//! `GET /docs`: the live binding table, in precedence order.

use axum::http::StatusCode;
use serde::Serialize;

use crate::http::{ApiRequest, Responder};
use crate::routing::{BindingInfo, HandlerResult, RouteGroup};

#[derive(Debug, Serialize)]
struct DocsBody {
    name: &'static str,
    version: &'static str,
    bindings: Vec<BindingInfo>,
}

pub fn group() -> RouteGroup {
    RouteGroup::new("docs").get("/docs", show)
}

async fn show(req: ApiRequest, res: Responder) -> HandlerResult {
    res.json(
        StatusCode::OK,
        DocsBody {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            bindings: req.route_table().describe(),
        },
    );
    Ok(())
}
