//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Check dependency URLs carry a host and port (SRV URLs: host only)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::AppConfig;
use crate::health::probe::{default_port, is_srv_scheme};

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self { field, reason: reason.into() }
    }
}

/// Check every semantic constraint and collect all violations.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::new("listener.port", "must be non-zero"));
    }
    if config.listener.bind_host.trim().is_empty() {
        errors.push(ValidationError::new("listener.bind_host", "must not be empty"));
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::new("limits.max_body_bytes", "must be non-zero"));
    }
    if config.limits.max_raw_body_bytes < config.limits.max_body_bytes {
        errors.push(ValidationError::new(
            "limits.max_raw_body_bytes",
            "must be at least limits.max_body_bytes",
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be non-zero"));
    }
    if config.timeouts.probe_timeout_secs == 0 {
        errors.push(ValidationError::new("timeouts.probe_timeout_secs", "must be non-zero"));
    }

    let deps = &config.dependencies;
    for (field, value) in [
        ("dependencies.database_url", deps.database_url.as_deref()),
        ("dependencies.queue_url", deps.queue_url.as_deref()),
    ] {
        if let Some(raw) = value {
            if let Err(reason) = check_endpoint(raw) {
                errors.push(ValidationError::new(field, reason));
            }
        }
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("`{}` is not a socket address", obs.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_endpoint(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| format!("`{raw}` is not a URL: {e}"))?;
    if url.host_str().is_none() {
        return Err(format!("`{raw}` has no host"));
    }
    if is_srv_scheme(url.scheme()) {
        return Ok(());
    }
    if url.port_or_known_default().is_none() && default_port(url.scheme()).is_none() {
        return Err(format!("`{raw}` has no port and scheme `{}` has no default", url.scheme()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = AppConfig::default();
        config.listener.port = 0;
        config.timeouts.request_secs = 0;
        config.dependencies.database_url = Some("not a url".into());

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["listener.port", "timeouts.request_secs", "dependencies.database_url"]
        );
    }

    #[test]
    fn known_schemes_need_no_explicit_port() {
        let mut config = AppConfig::default();
        config.dependencies.database_url = Some("mongodb://db/app".into());
        config.dependencies.queue_url = Some("amqp://mq".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn srv_connection_string_is_accepted() {
        let mut config = AppConfig::default();
        config.dependencies.database_url = Some("mongodb+srv://cluster0.x.mongodb.net/app".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn unknown_scheme_without_port_is_rejected() {
        let mut config = AppConfig::default();
        config.dependencies.queue_url = Some("custom://mq".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "dependencies.queue_url");
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
