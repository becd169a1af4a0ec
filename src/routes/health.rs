//! Liveness and readiness probes.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | Liveness | `/healthz` | Is the process alive? |
//! | Readiness | `/readyz` | Are the database and queue reachable? |

use axum::http::StatusCode;
use serde_json::json;

use crate::health::check_all;
use crate::http::{ApiRequest, Responder};
use crate::routing::{HandlerResult, RouteGroup};

pub fn group() -> RouteGroup {
    RouteGroup::new("health")
        .get("/healthz", liveness)
        .get("/readyz", readiness)
}

/// Always `200 ok`: if the process answers HTTP it is alive.
async fn liveness(_req: ApiRequest, res: Responder) -> HandlerResult {
    res.send("ok");
    Ok(())
}

async fn readiness(req: ApiRequest, res: Responder) -> HandlerResult {
    let statuses = check_all(req.context().dependencies()).await;
    let ready = statuses.iter().all(|s| s.ready);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    res.json(status, json!({ "ready": ready, "dependencies": statuses }));
    Ok(())
}
