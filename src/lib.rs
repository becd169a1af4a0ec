//! HTTP gateway for the customer, payments and messaging API.
//!
//! Every inbound request runs through one ordered pipeline:
//!
//! ```text
//!  request ──▶ request id ──▶ trace span ──▶ CORS ──▶ body decoding
//!                                                        │
//!          ┌─────────────────────────────────────────────┘
//!          ▼
//!   static assets (/, /images) ──▶ response guard ──▶ route bindings
//!                                                        │
//!          ┌─────────────────────────────────────────────┘
//!          ▼
//!   error hook ──▶ catch-all 404 ──▶ response
//! ```
//!
//! Route groups are registered once, in order, into a [`RouteTable`];
//! the first binding that sends a response owns the request. Handlers
//! answer through a send-once [`Responder`], so a second send is a no-op.
//!
//! ```rust,no_run
//! use gateway::http::{ApiRequest, Responder};
//! use gateway::routing::{HandlerResult, RouteGroup};
//! use gateway::{routes, AppConfig, Application};
//!
//! async fn show(req: ApiRequest, res: Responder) -> HandlerResult {
//!     res.send(format!("customer {}", req.param("id").unwrap_or("?")));
//!     Ok(())
//! }
//!
//! # async fn run() -> Result<(), gateway::StartupError> {
//! let table = routes::default_table()
//!     .mount("/customer", RouteGroup::new("customer").get("/{id}", show));
//! let app = Application::build(AppConfig::default(), table).await?;
//! app.run_until_stopped(gateway::lifecycle::signals::shutdown_signal()).await
//! # }
//! ```

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routes;
pub mod routing;

pub use config::AppConfig;
pub use http::{ApiRequest, Pipeline, Responder, SendOutcome};
pub use lifecycle::{AppContext, Application, Shutdown, StartupError};
pub use routing::{RouteGroup, RouteTable};
