//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Balancer::connect(cancel)
//!     → registry.rs (snapshot of name → connector, taken under the lock)
//!     → Apply selection policy:
//!         - random.rs (uniform pick per attempt)
//!         - round_robin.rs (rotate through the snapshot)
//!     → Connector::connect(cancel) on the chosen entry
//!     → resilience::retry (backoff, budget, cancellation)
//!     → Return connection or error
//! ```
//!
//! # Design Decisions
//! - Selectors are stateless with respect to membership; the registry owns it
//! - Every attempt re-snapshots, so membership changes apply to the next attempt
//! - The registry lock is never held across a connector call
//! - Failed connectors are not excluded; a retry may pick the same one again

pub mod balancer;
pub mod random;
pub mod registry;
pub mod round_robin;

use std::fmt::Debug;

pub use balancer::Balancer;
pub use random::Random;
pub use registry::{Candidate, Registry};
pub use round_robin::RoundRobin;

/// Connector selection policy.
pub trait Selector<C>: Send + Sync + Debug {
    /// Pick one candidate, or `None` when there are none.
    fn next_connector(&self, candidates: &[Candidate<C>]) -> Option<Candidate<C>>;
}
