//! Round-robin selection strategy.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::load_balancer::{registry::Candidate, Selector};

/// Round-robin selector.
/// Stores an internal counter to rotate through the snapshot, so successive
/// retries visit different connectors while membership is stable.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C> Selector<C> for RoundRobin {
    fn next_connector(&self, candidates: &[Candidate<C>]) -> Option<Candidate<C>> {
        if candidates.is_empty() {
            return None;
        }

        let index = self.counter.fetch_add(1, Ordering::Relaxed) % candidates.len();
        Some(candidates[index].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(names: &[&str]) -> Vec<Candidate<()>> {
        names
            .iter()
            .map(|name| Candidate {
                name: name.to_string(),
                connector: None,
            })
            .collect()
    }

    #[test]
    fn test_round_robin() {
        let lb = RoundRobin::new();
        let backends = candidates(&["b1", "b2"]);

        let s1 = lb.next_connector(&backends).unwrap();
        assert_eq!(s1.name, "b1");

        let s2 = lb.next_connector(&backends).unwrap();
        assert_eq!(s2.name, "b2");

        let s3 = lb.next_connector(&backends).unwrap();
        assert_eq!(s3.name, "b1");
    }

    #[test]
    fn shrinking_snapshot_stays_in_bounds() {
        let lb = RoundRobin::new();
        lb.next_connector(&candidates(&["a", "b", "c"]));
        lb.next_connector(&candidates(&["a", "b", "c"]));

        let s = lb.next_connector(&candidates(&["only"])).unwrap();
        assert_eq!(s.name, "only");
        assert!(lb.next_connector(&candidates(&[])).is_none());
    }
}
