//! The connection balancer.
//!
//! # Responsibilities
//! - Hold the connector registry and the selection policy
//! - Drive one connect request through select → attempt → backoff
//! - Stand in for a single connector or driver (balancers nest)

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::config::{
    validate_backoff, BackoffConfig, BalancerConfig, SelectionStrategy, ValidationError,
};
use crate::driver::{Connector, Driver, DriverContext};
use crate::error::{Error, Result, VacantConnector};
use crate::lifecycle::Cancellation;
use crate::load_balancer::{
    random::Random, registry::Registry, round_robin::RoundRobin, Selector,
};
use crate::resilience::{exponential_backoff, retry, AttemptError};

/// Connector that spreads connection establishment over registered connectors.
///
/// Cloning is cheap and yields a handle to the same registry.
pub struct Balancer<C> {
    inner: Arc<Inner<C>>,
}

struct Inner<C> {
    registry: Registry<C>,
    selector: Box<dyn Selector<C>>,
    backoff: ArcSwap<BackoffConfig>,
}

impl<C: Send + 'static> Balancer<C> {
    /// Random selection with the default backoff schedule.
    pub fn new() -> Self {
        Self::build(BackoffConfig::default(), Box::new(Random::new()))
    }

    /// Build from a config, rejecting an invalid backoff schedule.
    pub fn from_config(config: &BalancerConfig) -> Result<Self, Vec<ValidationError>> {
        match config.selection {
            SelectionStrategy::Random => Self::with_selector(config.backoff.clone(), Random::new()),
            SelectionStrategy::RoundRobin => {
                Self::with_selector(config.backoff.clone(), RoundRobin::new())
            }
        }
    }

    /// Build with a custom selector, rejecting an invalid backoff schedule.
    pub fn with_selector(
        backoff: BackoffConfig,
        selector: impl Selector<C> + 'static,
    ) -> Result<Self, Vec<ValidationError>> {
        validate_backoff(&backoff)?;
        Ok(Self::build(backoff, Box::new(selector)))
    }

    fn build(backoff: BackoffConfig, selector: Box<dyn Selector<C>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: Registry::new(),
                selector,
                backoff: ArcSwap::from_pointee(backoff),
            }),
        }
    }

    /// Register `connector` under `name`, replacing any previous entry.
    pub fn add(&self, name: impl Into<String>, connector: impl Connector<C> + 'static) {
        self.add_shared(name, Arc::new(connector));
    }

    /// Register an already shared connector under `name`.
    pub fn add_shared(&self, name: impl Into<String>, connector: Arc<dyn Connector<C>>) {
        let name = name.into();
        tracing::debug!(connector = %name, "Adding connector");
        self.inner.registry.add(name, connector);
    }

    /// Register `name` with no connector behind it; selecting it fails the attempt.
    pub fn add_vacant(&self, name: impl Into<String>) {
        let name = name.into();
        tracing::debug!(connector = %name, "Adding vacant connector");
        self.inner.registry.add_vacant(name);
    }

    /// Remove the connector registered under `name`, if any.
    ///
    /// Attempts already using it are not interrupted.
    pub fn remove(&self, name: &str) {
        if self.inner.registry.remove(name) {
            tracing::debug!(connector = %name, "Removed connector");
        }
    }

    /// Names of all registered connectors, in no particular order.
    pub fn connector_names(&self) -> Vec<String> {
        self.inner.registry.names()
    }

    pub fn len(&self) -> usize {
        self.inner.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.registry.is_empty()
    }

    pub fn backoff_config(&self) -> Arc<BackoffConfig> {
        self.inner.backoff.load_full()
    }

    /// Replace the backoff schedule used by subsequent connect calls.
    ///
    /// An invalid schedule is rejected and the current one stays in place.
    pub fn reconfigure(&self, backoff: BackoffConfig) -> Result<(), Vec<ValidationError>> {
        validate_backoff(&backoff)?;
        tracing::info!(
            initial_interval_ms = backoff.initial_interval_ms,
            max_interval_ms = backoff.max_interval_ms,
            max_elapsed_time_ms = backoff.max_elapsed_time_ms,
            "Backoff configuration updated"
        );
        self.inner.backoff.store(Arc::new(backoff));
        Ok(())
    }

    /// Apply schedules published by a [`ConfigWatcher`](crate::config::ConfigWatcher)
    /// until the channel closes or `cancel` fires. Invalid schedules are
    /// logged and skipped.
    pub async fn apply_config_updates(
        &self,
        mut updates: mpsc::UnboundedReceiver<BackoffConfig>,
        cancel: &Cancellation,
    ) {
        loop {
            let update = tokio::select! {
                update = updates.recv() => update,
                _ = cancel.cancelled() => None,
            };
            let Some(backoff) = update else { break };

            if let Err(errors) = self.reconfigure(backoff) {
                tracing::warn!(
                    errors = ?errors,
                    "Rejected backoff update, keeping current schedule"
                );
            }
        }
        tracing::debug!("Stopped applying config updates");
    }

    /// Establish a connection through one of the registered connectors.
    ///
    /// Retries failed attempts with exponential backoff. Returns
    /// [`Error::NoConnectors`] as soon as an attempt finds the registry empty,
    /// the cancellation's reason if `cancel` fires first, and otherwise the
    /// last connector error once the backoff budget is spent.
    pub async fn connect(&self, cancel: &Cancellation) -> Result<C> {
        let mut backoff = exponential_backoff(&self.inner.backoff.load_full());
        retry(&mut backoff, cancel, |attempt| self.attempt(cancel, attempt)).await
    }

    async fn attempt(&self, cancel: &Cancellation, attempt: u32) -> Result<C, AttemptError> {
        let candidates = self.inner.registry.snapshot();
        let Some(candidate) = self.inner.selector.next_connector(&candidates) else {
            return Err(AttemptError::permanent(Error::NoConnectors));
        };

        if let Some(reason) = cancel.reason() {
            return Err(AttemptError::permanent(reason.into()));
        }

        let Some(connector) = candidate.connector else {
            tracing::warn!(connector = %candidate.name, attempt, "Selected vacant connector");
            return Err(AttemptError::transient(Error::connect(VacantConnector {
                name: candidate.name,
            })));
        };

        tracing::debug!(
            connector = %candidate.name,
            attempt,
            candidates = candidates.len(),
            "Connecting"
        );

        match connector.connect(cancel).await {
            Ok(conn) => {
                tracing::debug!(connector = %candidate.name, attempt, "Connected");
                Ok(conn)
            }
            Err(e) => {
                tracing::warn!(connector = %candidate.name, attempt, error = %e, "Connector failed");
                Err(AttemptError::transient(e))
            }
        }
    }
}

impl<C: Send + 'static> Default for Balancer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for Balancer<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> fmt::Debug for Balancer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Balancer")
            .field("registry", &self.inner.registry)
            .field("selector", &self.inner.selector)
            .field("backoff", &self.inner.backoff.load_full())
            .finish()
    }
}

#[async_trait]
impl<C: Send + 'static> Connector<C> for Balancer<C> {
    async fn connect(&self, cancel: &Cancellation) -> Result<C> {
        Balancer::connect(self, cancel).await
    }

    fn driver(&self) -> Option<&dyn Driver<C>> {
        Some(self)
    }
}

#[async_trait]
impl<C: Send + 'static> Driver<C> for Balancer<C> {
    /// Connect with no deadline. The name is ignored.
    async fn open(&self, _name: &str) -> Result<C> {
        Balancer::connect(self, &Cancellation::new()).await
    }
}

impl<C: Send + 'static> DriverContext<C> for Balancer<C> {
    /// Hand out this balancer as a cancellation-aware connector. The name is ignored.
    fn open_connector(&self, _name: &str) -> Result<Arc<dyn Connector<C>>> {
        Ok(Arc::new(self.clone()))
    }
}
