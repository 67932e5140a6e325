//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Balancer, registry and retry loop produce:
//!     → tracing events (connector name, attempt, delay, error)
//!     → logging.rs (EnvFilter + fmt layer, pretty or JSON)
//! ```
//!
//! # Design Decisions
//! - Structured fields, never interpolated messages
//! - Debug for per-attempt detail, warn for connector failures
//! - Library code only emits events; installing a subscriber is the host's call

pub mod logging;

pub use logging::init_logging;
