//! Connection-establishment load balancer.
//!
//! # Architecture Overview
//!
//! ```text
//!     caller ──connect(cancel)──▶ ┌──────────────────────────────────────────┐
//!                                 │                BALANCER                  │
//!                                 │                                          │
//!                                 │  ┌──────────┐  snapshot  ┌───────────┐   │
//!                                 │  │ registry │───────────▶│ selector  │   │
//!                                 │  │name→conn │            │random / rr│   │
//!                                 │  └──────────┘            └─────┬─────┘   │
//!                                 │                                │         │
//!                                 │                                ▼         │
//!                                 │  ┌────────────────┐     ┌────────────┐   │
//!                                 │  │   resilience   │◀────│ connector  │───┼──▶ database
//!                                 │  │ backoff/retry  │fail │  connect   │   │
//!                                 │  └────────────────┘     └────────────┘   │
//!                                 └──────────────────────────────────────────┘
//! ```
//!
//! A [`Balancer`] is itself a [`Connector`], [`Driver`] and [`DriverContext`],
//! so it can be registered inside another balancer.

pub mod config;
pub mod driver;
pub mod error;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;
pub mod resilience;

pub use config::BalancerConfig;
pub use driver::{Connector, Driver, DriverContext};
pub use error::{BoxError, Error, Result, VacantConnector};
pub use lifecycle::{CancelReason, Cancellation};
pub use load_balancer::Balancer;
