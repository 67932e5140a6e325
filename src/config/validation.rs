//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, multiplier >= 1)
//! - Check the log level is one tracing understands
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BalancerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::{BackoffConfig, BalancerConfig, ObservabilityConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("backoff.initial_interval_ms must be greater than 0")]
    ZeroInitialInterval,

    #[error("backoff.multiplier must be at least 1.0, got {0}")]
    MultiplierBelowOne(f64),

    #[error("backoff.randomization_factor must be within [0, 1], got {0}")]
    RandomizationOutOfRange(f64),

    #[error("backoff.max_interval_ms ({max_ms}) is below initial_interval_ms ({initial_ms})")]
    MaxIntervalBelowInitial { initial_ms: u64, max_ms: u64 },

    #[error("observability.log_level {0:?} is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Validate a whole configuration, collecting every error.
pub fn validate_config(config: &BalancerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_backoff(&config.backoff, &mut errors);
    check_observability(&config.observability, &mut errors);
    into_result(errors)
}

/// Validate only the backoff schedule. Used wherever a schedule enters a
/// balancer without going through a config file.
pub fn validate_backoff(backoff: &BackoffConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_backoff(backoff, &mut errors);
    into_result(errors)
}

fn into_result(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_backoff(backoff: &BackoffConfig, errors: &mut Vec<ValidationError>) {
    if backoff.initial_interval_ms == 0 {
        errors.push(ValidationError::ZeroInitialInterval);
    }
    if backoff.multiplier.is_nan() || backoff.multiplier < 1.0 {
        errors.push(ValidationError::MultiplierBelowOne(backoff.multiplier));
    }
    // NaN is outside every range.
    if !(0.0..=1.0).contains(&backoff.randomization_factor) {
        errors.push(ValidationError::RandomizationOutOfRange(backoff.randomization_factor));
    }
    if backoff.max_interval_ms < backoff.initial_interval_ms {
        errors.push(ValidationError::MaxIntervalBelowInitial {
            initial_ms: backoff.initial_interval_ms,
            max_ms: backoff.max_interval_ms,
        });
    }
}

fn check_observability(observability: &ObservabilityConfig, errors: &mut Vec<ValidationError>) {
    let level = observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(observability.log_level.clone()));
    }
}
