//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file (dotenvy)          → process environment
//! config file (TOML, optional) → loader.rs (parse & deserialize)
//! process environment          → loader.rs (PORT / API_PORT, SENTRY_DSN, ...)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared via AppContext to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, ConfigError};
pub use schema::AppConfig;
pub use schema::{
    AssetsConfig, CorsConfig, DependenciesConfig, LimitsConfig, ListenerConfig,
    ObservabilityConfig, TimeoutConfig,
};
