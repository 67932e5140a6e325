//! Capability traits shared by connectors, drivers and the balancer.
//!
//! A [`Connector`] produces connections on demand. A [`Driver`] opens a
//! connection from a name. A [`DriverContext`] hands out connectors that honour
//! cancellation. [`Balancer`](crate::Balancer) implements all three, so it can
//! be registered inside another balancer.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::lifecycle::Cancellation;

/// Something that can establish a new connection of type `C`, or fail.
#[async_trait]
pub trait Connector<C>: Send + Sync {
    /// Establish a connection. Implementations should give up when `cancel` fires.
    async fn connect(&self, cancel: &Cancellation) -> Result<C>;

    /// The driver this connector belongs to, if it exposes one.
    fn driver(&self) -> Option<&dyn Driver<C>> {
        None
    }
}

/// Name-addressed connection opener.
#[async_trait]
pub trait Driver<C>: Send + Sync {
    async fn open(&self, name: &str) -> Result<C>;
}

/// Driver that can hand out cancellation-aware connectors.
pub trait DriverContext<C>: Driver<C> {
    fn open_connector(&self, name: &str) -> Result<Arc<dyn Connector<C>>>;
}
