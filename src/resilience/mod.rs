//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Connect request:
//!     → retries.rs (run attempt, classify failure as backoff::Error)
//!     → On transient failure: backoff.rs schedule (next jittered delay or stop)
//!     → sleep raced against the caller's cancellation
//!     → next attempt
//! ```
//!
//! # Design Decisions
//! - One backoff schedule per connect request, never shared between callers
//! - Jittered backoff prevents thundering herd
//! - Elapsed-time budget bounds the whole request, not single attempts

pub mod backoff;
pub mod retries;

pub use self::backoff::{exponential_backoff, ExponentialBackoff, TokioClock};
pub use retries::{retry, AttemptError};
