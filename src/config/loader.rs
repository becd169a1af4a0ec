//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid environment variable {name}: {reason}")]
    Env { name: &'static str, reason: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Build the runtime configuration.
///
/// Order: `.env` file (if any) into the process environment, then the
/// optional TOML file, then environment overrides, then validation.
pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match dotenvy::dotenv() {
        Ok(file) => tracing::debug!(path = %file.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }

    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// `PORT` wins over `API_PORT`. Empty values are treated as unset.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some((name, raw)) = get("PORT")
        .map(|v| ("PORT", v))
        .or_else(|| get("API_PORT").map(|v| ("API_PORT", v)))
    {
        config.listener.port = raw.trim().parse().map_err(|e| ConfigError::Env {
            name,
            reason: format!("`{raw}` is not a port: {e}"),
        })?;
    }

    if let Some(host) = get("BIND_HOST") {
        config.listener.bind_host = host;
    }
    if let Some(dsn) = get("SENTRY_DSN") {
        config.observability.error_tracing_dsn = Some(dsn);
    }
    if let Some(level) = get("LOG_LEVEL") {
        config.observability.log_level = level;
    }
    if let Some(url) = get("DATABASE_URL") {
        config.dependencies.database_url = Some(url);
    }
    if let Some(url) = get("QUEUE_URL").or_else(|| get("AMQP_URL")) {
        config.dependencies.queue_url = Some(url);
    }
    if let Some(dir) = get("PUBLIC_DIR") {
        config.assets.public_dir = PathBuf::from(dir);
    }
    if let Some(dir) = get("IMAGES_DIR") {
        config.assets.images_dir = PathBuf::from(dir);
    }

    Ok(())
}
