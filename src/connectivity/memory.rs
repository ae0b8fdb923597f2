//! In-memory connectivity graph.
//!
//! Reference `ConnectivityGraph`: minima plus undirected transition-state
//! edges, with components found by BFS. Cloning yields another handle to the
//! same graph, so the search can keep adding transition states while a
//! proximity graph holds a handle.

use std::collections::VecDeque;
use std::sync::Arc;
use hashbrown::{HashMap, HashSet};
use parking_lot::RwLock;
use smallvec::SmallVec;

use crate::model::{Minimum, MinimumId};
use super::ConnectivityGraph;

/// Most minima have only a handful of transition states.
type Neighbors = SmallVec<[MinimumId; 4]>;

#[derive(Clone, Default)]
pub struct TransitionStateGraph {
    inner: Arc<RwLock<TsInner>>,
}

#[derive(Default)]
struct TsInner {
    minima: HashMap<MinimumId, Minimum>,
    adjacency: HashMap<MinimumId, Neighbors>,
    transition_states: usize,
}

impl TransitionStateGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_minimum(&self, minimum: Minimum) {
        let mut inner = self.inner.write();
        inner.adjacency.entry(minimum.id).or_default();
        inner.minima.insert(minimum.id, minimum);
    }

    /// Record a transition state joining `a` and `b`. Both must already be
    /// known minima; returns false otherwise.
    pub fn add_transition_state(&self, a: MinimumId, b: MinimumId) -> bool {
        let mut inner = self.inner.write();
        if !inner.minima.contains_key(&a) || !inner.minima.contains_key(&b) {
            return false;
        }
        if a != b {
            inner.adjacency.entry(a).or_default().push(b);
            inner.adjacency.entry(b).or_default().push(a);
        }
        inner.transition_states += 1;
        true
    }

    pub fn minimum_count(&self) -> usize {
        self.inner.read().minima.len()
    }

    pub fn transition_state_count(&self) -> usize {
        self.inner.read().transition_states
    }
}

impl TsInner {
    fn component(&self, start: MinimumId) -> HashSet<MinimumId> {
        let mut seen = HashSet::new();
        if !self.minima.contains_key(&start) {
            return seen;
        }
        let mut queue = VecDeque::from([start]);
        seen.insert(start);
        while let Some(id) = queue.pop_front() {
            for next in self.adjacency.get(&id).into_iter().flatten() {
                if seen.insert(*next) {
                    queue.push_back(*next);
                }
            }
        }
        seen
    }
}

impl ConnectivityGraph for TransitionStateGraph {
    fn are_connected(&self, a: MinimumId, b: MinimumId) -> bool {
        let inner = self.inner.read();
        if a == b {
            return inner.minima.contains_key(&a);
        }
        inner.component(a).contains(&b)
    }

    fn connected_component(&self, m: MinimumId) -> HashSet<MinimumId> {
        self.inner.read().component(m)
    }

    fn minima(&self) -> Vec<Minimum> {
        let mut all: Vec<Minimum> = self.inner.read().minima.values().cloned().collect();
        all.sort_by_key(|m| m.id);
        all
    }
}
