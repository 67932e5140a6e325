//! Hot reload of the backoff schedule from a config file.
//!
//! # Responsibilities
//! - Re-read the balancer config when its file changes
//! - Publish the new backoff schedule only when it actually changed
//! - Report selection changes, which need a new balancer to take effect

use std::path::{Path, PathBuf};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::{BackoffConfig, BalancerConfig};

/// What a reload did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// A new backoff schedule was sent to the balancer.
    Published,
    /// The file parsed but the backoff schedule is the same as before.
    Unchanged,
    /// The file failed to load or validate; nothing was sent.
    Rejected,
    /// The balancer stopped listening; nothing was sent.
    Closed,
}

/// Tracks the last accepted config and forwards backoff changes.
#[derive(Debug)]
pub struct Reloader {
    path: PathBuf,
    current: BalancerConfig,
    backoff_tx: mpsc::UnboundedSender<BackoffConfig>,
}

impl Reloader {
    /// Re-read the file and publish its backoff schedule if it changed.
    pub fn reload(&mut self) -> ReloadOutcome {
        let next = match load_config(&self.path) {
            Ok(next) => next,
            Err(e) => {
                tracing::error!(path = ?self.path, error = %e, "Config reload rejected, keeping current schedule");
                return ReloadOutcome::Rejected;
            }
        };

        if next.selection != self.current.selection {
            tracing::warn!(
                current = ?self.current.selection,
                requested = ?next.selection,
                "Selection strategy changes need a new balancer, ignoring"
            );
        }

        if next.backoff == self.current.backoff {
            self.current = next;
            return ReloadOutcome::Unchanged;
        }

        if self.backoff_tx.send(next.backoff.clone()).is_err() {
            tracing::warn!(path = ?self.path, "Balancer no longer accepts config updates");
            return ReloadOutcome::Closed;
        }

        tracing::info!(path = ?self.path, "Published reloaded backoff schedule");
        self.current = next;
        ReloadOutcome::Published
    }
}

/// Watches a balancer config file and feeds backoff changes to
/// [`Balancer::apply_config_updates`](crate::Balancer::apply_config_updates).
#[derive(Debug)]
pub struct ConfigWatcher {
    reloader: Reloader,
}

impl ConfigWatcher {
    /// Load `path` once.
    ///
    /// Returns the watcher, the initial config (to build the balancer with)
    /// and the receiver of later backoff schedules.
    pub fn open(
        path: &Path,
    ) -> Result<(Self, BalancerConfig, mpsc::UnboundedReceiver<BackoffConfig>), ConfigError> {
        let current = load_config(path)?;
        let (backoff_tx, backoff_rx) = mpsc::unbounded_channel();

        let watcher = Self {
            reloader: Reloader {
                path: path.to_path_buf(),
                current: current.clone(),
                backoff_tx,
            },
        };
        Ok((watcher, current, backoff_rx))
    }

    /// Hand out the reload logic without a filesystem watch.
    pub fn into_reloader(self) -> Reloader {
        self.reloader
    }

    /// Start watching. Reloads stop when the returned handle is dropped.
    pub fn watch(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self.reloader.path.clone();
        let mut reloader = self.reloader;

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                reloader.reload();
            }
            Ok(_) => {}
            Err(e) => tracing::error!(error = %e, "Config watch error"),
        })?;
        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::debug!(path = ?path, "Watching balancer config");
        Ok(watcher)
    }
}
