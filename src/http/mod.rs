//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum serve, graceful shutdown)
//!     → pipeline.rs (layers, then stages in fixed order)
//!         → middleware/ (CORS, body decoding)
//!         → assets.rs (static mounts)
//!         → request.rs / response.rs (ApiRequest, send-once Responder)
//!         → routing (ordered bindings)
//!     → Send to client
//! ```

pub mod assets;
pub mod middleware;
pub mod pipeline;
pub mod request;
pub mod response;
pub mod server;

pub use pipeline::Pipeline;
pub use request::{ApiRequest, RequestBody, X_REQUEST_ID};
pub use response::{Responder, SendOutcome};
pub use server::HttpServer;
