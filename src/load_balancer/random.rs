//! Uniform random selection strategy.

use rand::Rng;

use crate::load_balancer::{registry::Candidate, Selector};

/// Picks uniformly at random on every call, with no memory of past picks.
#[derive(Debug, Default)]
pub struct Random;

impl Random {
    pub fn new() -> Self {
        Self
    }
}

impl<C> Selector<C> for Random {
    fn next_connector(&self, candidates: &[Candidate<C>]) -> Option<Candidate<C>> {
        match candidates.len() {
            0 => None,
            1 => Some(candidates[0].clone()),
            len => Some(candidates[rand::thread_rng().gen_range(0..len)].clone()),
        }
    }
}
