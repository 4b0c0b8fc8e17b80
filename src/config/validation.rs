//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (grace period bound, pool sizes, ports)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: CoordinationConfig → Result<(), Vec<ValidationError>>

use crate::config::schema::{CoordinationConfig, PostgresConfig};

/// Longest grace period accepted for channel shutdown.
pub const MAX_GRACE_PERIOD_MS: u64 = 10 * 60 * 1000;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &CoordinationConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.shutdown.grace_period_ms > MAX_GRACE_PERIOD_MS {
        errors.push(ValidationError::new(
            "shutdown.grace_period_ms",
            format!("must be at most {MAX_GRACE_PERIOD_MS}"),
        ));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level {:?}", config.observability.log_level),
        ));
    }

    if let Some(postgres) = &config.postgres {
        validate_postgres(postgres, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_postgres(config: &PostgresConfig, errors: &mut Vec<ValidationError>) {
    if config.host.trim().is_empty() {
        errors.push(ValidationError::new("postgres.host", "must not be empty"));
    }
    if config.port == 0 {
        errors.push(ValidationError::new("postgres.port", "must not be 0"));
    }
    if config.user.trim().is_empty() {
        errors.push(ValidationError::new("postgres.user", "must not be empty"));
    }
    if config.database.trim().is_empty() {
        errors.push(ValidationError::new("postgres.database", "must not be empty"));
    }
    if config.max_connections == 0 {
        errors.push(ValidationError::new("postgres.max_connections", "must be positive"));
    }
    if config.min_connections > config.max_connections {
        errors.push(ValidationError::new(
            "postgres.min_connections",
            "must not exceed max_connections",
        ));
    }
}
