//! Shared mock connectors for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use conn_balancer::config::BackoffConfig;
use conn_balancer::{Cancellation, Connector, Error, Result};

/// Connection handed out by mock connectors, tagged with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockConn {
    pub source: String,
}

/// Connector that always succeeds and counts its calls.
#[derive(Debug)]
pub struct Succeeding {
    name: String,
    pub calls: AtomicUsize,
}

impl Succeeding {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector<MockConn> for Succeeding {
    async fn connect(&self, _cancel: &Cancellation) -> Result<MockConn> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(MockConn {
            source: self.name.clone(),
        })
    }
}

/// Connector that always fails with `message` and counts its calls.
#[derive(Debug)]
pub struct Failing {
    message: &'static str,
    pub calls: AtomicUsize,
}

impl Failing {
    pub fn new(message: &'static str) -> Arc<Self> {
        Arc::new(Self {
            message,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector<MockConn> for Failing {
    async fn connect(&self, _cancel: &Cancellation) -> Result<MockConn> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::connect(self.message))
    }
}

/// Connector that fails `failures` times before succeeding.
#[derive(Debug)]
pub struct Flaky {
    failures: usize,
    pub calls: AtomicUsize,
}

impl Flaky {
    pub fn new(failures: usize) -> Arc<Self> {
        Arc::new(Self {
            failures,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Connector<MockConn> for Flaky {
    async fn connect(&self, _cancel: &Cancellation) -> Result<MockConn> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            Err(Error::connect(format!("flaky failure {call}")))
        } else {
            Ok(MockConn {
                source: "flaky".into(),
            })
        }
    }
}

/// Connector that waits for `delay` unless canceled first.
#[derive(Debug)]
pub struct Slow {
    pub delay: Duration,
}

#[async_trait]
impl Connector<MockConn> for Slow {
    async fn connect(&self, cancel: &Cancellation) -> Result<MockConn> {
        tokio::select! {
            reason = cancel.cancelled() => Err(reason.into()),
            _ = tokio::time::sleep(self.delay) => Ok(MockConn { source: "slow".into() }),
        }
    }
}

/// Deterministic, quick schedule: fixed `interval_ms` delays within `budget_ms`.
pub fn fixed_backoff(interval_ms: u64, budget_ms: u64) -> BackoffConfig {
    BackoffConfig {
        initial_interval_ms: interval_ms,
        randomization_factor: 0.0,
        multiplier: 1.0,
        max_interval_ms: interval_ms,
        max_elapsed_time_ms: budget_ms,
    }
}
