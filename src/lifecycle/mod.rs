//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Caller creates Cancellation (optionally with a deadline)
//!     → passed by reference into Balancer::connect
//!     → forwarded to every connector attempt
//!     → raced against each backoff sleep
//!     → cancel() or deadline → CancelReason surfaced as Error::Canceled
//! ```
//!
//! # Design Decisions
//! - Cancellation is cooperative; connectors receive the token and decide
//! - Child cancellations fire with their parent, never the reverse
//! - Deadline expiry and explicit cancel are distinct reasons

pub mod cancel;

pub use cancel::{CancelReason, Cancellation};
