//! Shared helpers for the end-to-end tests.
//!
//! Minima carry their id as the first coordinate so a table-driven oracle
//! can hand out distances that need not come from any real geometry.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use landscape_graph::{
    Alignment, DistanceOracle, Error, GraphConfig, MemoryBackend, Minimum, MinimumId,
    ProximityGraph, Result, RoutePlanner, TransitionStateGraph,
};

pub fn minimum(id: u64) -> Minimum {
    Minimum::new(MinimumId(id), -(id as f64), vec![id as f64])
}

/// Oracle answering from a fixed table of distances, counting its calls.
#[derive(Clone, Default)]
pub struct TableOracle {
    table: HashMap<(u64, u64), f64>,
    calls: Rc<Cell<usize>>,
}

impl TableOracle {
    pub fn new(entries: &[(u64, u64, f64)]) -> Self {
        let mut table = HashMap::new();
        for (a, b, d) in entries {
            table.insert((*a.min(b), *a.max(b)), *d);
        }
        Self { table, calls: Rc::new(Cell::new(0)) }
    }

    /// Shared call counter, still readable after the oracle moved into a graph.
    pub fn counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.calls)
    }
}

impl DistanceOracle for TableOracle {
    fn distance(&self, a: &[f64], b: &[f64]) -> Result<Alignment> {
        self.calls.set(self.calls.get() + 1);
        let (ia, ib) = (a[0] as u64, b[0] as u64);
        let key = (ia.min(ib), ia.max(ib));
        let distance = *self
            .table
            .get(&key)
            .ok_or_else(|| Error::OracleError(format!("no distance for {key:?}")))?;
        Ok(Alignment { distance, aligned_a: a.to_vec(), aligned_b: b.to_vec() })
    }
}

pub type TestGraph = ProximityGraph<MemoryBackend, TransitionStateGraph, TableOracle>;
pub type TestPlanner = RoutePlanner<MemoryBackend, TransitionStateGraph, TableOracle>;

/// Store and connectivity graph that both know `ids`.
pub fn world(ids: &[u64]) -> (MemoryBackend, TransitionStateGraph) {
    let store = MemoryBackend::new();
    let ts = TransitionStateGraph::new();
    for id in ids {
        store.add_minimum(minimum(*id));
        ts.add_minimum(minimum(*id));
    }
    (store, ts)
}

pub fn graph(ids: &[u64], oracle: TableOracle, config: GraphConfig) -> (TestGraph, MemoryBackend, TransitionStateGraph) {
    let (store, ts) = world(ids);
    let g = ProximityGraph::new(store.clone(), ts.clone(), oracle, config).unwrap();
    (g, store, ts)
}

pub fn ids_of(minima: &[Minimum]) -> Vec<u64> {
    minima.iter().map(|m| m.id.0).collect()
}
