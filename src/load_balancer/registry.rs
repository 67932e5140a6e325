//! Connector registry.
//!
//! # Responsibilities
//! - Own the name → connector mapping behind one lock
//! - Serialize add/remove against each other
//! - Hand out point-in-time snapshots for selection

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::driver::Connector;

type Slot<C> = Option<Arc<dyn Connector<C>>>;

/// One registry entry as seen by a selector.
pub struct Candidate<C> {
    /// Name the connector was registered under.
    pub name: String,
    /// `None` for a vacant entry.
    pub connector: Slot<C>,
}

impl<C> Clone for Candidate<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            connector: self.connector.clone(),
        }
    }
}

impl<C> fmt::Debug for Candidate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("name", &self.name)
            .field("vacant", &self.connector.is_none())
            .finish()
    }
}

/// Name-keyed set of connectors.
pub struct Registry<C> {
    connectors: Mutex<HashMap<String, Slot<C>>>,
}

impl<C> Registry<C> {
    pub fn new() -> Self {
        Self {
            connectors: Mutex::new(HashMap::new()),
        }
    }

    /// Insert or replace the entry for `name`.
    pub fn add(&self, name: impl Into<String>, connector: Arc<dyn Connector<C>>) {
        self.insert(name.into(), Some(connector));
    }

    /// Insert an entry with no connector behind it. Selecting it fails.
    pub fn add_vacant(&self, name: impl Into<String>) {
        self.insert(name.into(), None);
    }

    fn insert(&self, name: String, slot: Slot<C>) {
        let mut connectors = self.connectors.lock().expect("connector registry mutex poisoned");
        connectors.insert(name, slot);
    }

    /// Remove the entry for `name`. Returns whether one was present.
    pub fn remove(&self, name: &str) -> bool {
        let mut connectors = self.connectors.lock().expect("connector registry mutex poisoned");
        connectors.remove(name).is_some()
    }

    /// Names currently registered, in no particular order.
    pub fn names(&self) -> Vec<String> {
        let connectors = self.connectors.lock().expect("connector registry mutex poisoned");
        connectors.keys().cloned().collect()
    }

    /// Copy of every entry, ordered by name.
    pub fn snapshot(&self) -> Vec<Candidate<C>> {
        let mut candidates: Vec<_> = {
            let connectors = self.connectors.lock().expect("connector registry mutex poisoned");
            connectors
                .iter()
                .map(|(name, connector)| Candidate {
                    name: name.clone(),
                    connector: connector.clone(),
                })
                .collect()
        };
        candidates.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        candidates
    }

    pub fn len(&self) -> usize {
        self.connectors.lock().expect("connector registry mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("names", &self.names()).finish()
    }
}
