//! Cross-cutting request stages that run before routing.

pub mod body;
pub mod cors;

pub use body::{decode, limit_for, read_body, BodyError};
pub use cors::cors_layer;
