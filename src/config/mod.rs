//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BalancerConfig (validated, immutable)
//!     → Balancer::from_config
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → Reloader compares against the last accepted config
//!     → changed BackoffConfig sent over an mpsc channel
//!     → Balancer::apply_config_updates swaps the backoff schedule
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Only the backoff schedule is hot-swappable; selection needs a new balancer

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{BackoffConfig, BalancerConfig, ObservabilityConfig, SelectionStrategy};
pub use validation::{validate_backoff, validate_config, ValidationError};
pub use watcher::{ConfigWatcher, ReloadOutcome, Reloader};
