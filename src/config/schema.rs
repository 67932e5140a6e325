//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the balancer.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for a balancer.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct BalancerConfig {
    /// Retry schedule between connection attempts.
    pub backoff: BackoffConfig,

    /// Policy used to pick a connector per attempt.
    pub selection: SelectionStrategy,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Connector selection policy.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Uniform random pick per attempt.
    #[default]
    Random,
    /// Rotate through the snapshot, one step per attempt.
    RoundRobin,
}

/// Exponential backoff configuration.
///
/// Defaults follow the conventional exponential backoff schedule:
/// 500ms initial interval, 0.5 randomization, 1.5 multiplier, 60s cap and a
/// 15 minute budget.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BackoffConfig {
    /// First retry delay in milliseconds.
    pub initial_interval_ms: u64,

    /// Jitter applied to each delay, as a fraction of it (0.0 to 1.0).
    pub randomization_factor: f64,

    /// Growth factor applied to the delay after each retry.
    pub multiplier: f64,

    /// Upper bound on a single delay in milliseconds.
    pub max_interval_ms: u64,

    /// Total retry budget in milliseconds, measured from the first attempt.
    /// 0 disables the budget.
    pub max_elapsed_time_ms: u64,
}

impl BackoffConfig {
    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms)
    }

    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms)
    }

    /// `None` when the budget is unbounded.
    pub fn max_elapsed_time(&self) -> Option<Duration> {
        match self.max_elapsed_time_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: 500,
            randomization_factor: 0.5,
            multiplier: 1.5,
            max_interval_ms: 60_000,
            max_elapsed_time_ms: 15 * 60 * 1000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON lines instead of human-readable logs.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
