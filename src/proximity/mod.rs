//! # Proximity Graph
//!
//! Undirected weighted graph over the *activated* minima of one
//! connection-search session. The target topology is complete over the
//! activated set, minus blocked pairs:
//!
//! | Edge | Meaning | Weight |
//! |------|---------|--------|
//! | `Confirmed` | endpoints connected in the connectivity graph | 0 |
//! | `Estimated(w)` | not (yet) known to be connected | `transform(distance)` |
//!
//! Blocked pairs (failed direct connection attempts) never get an edge again
//! during the session.
//!
//! Vertices live in a slot-map arena; adjacency is keyed by vertex key, so
//! removal and merge are O(degree).
//!
//! The graph can drift out of sync with the connectivity graph when the
//! search learns connections without telling this graph. `repair()`
//! reconciles the two.

mod merge;
mod path;
mod repair;

use hashbrown::{HashMap, HashSet};
use slotmap::{new_key_type, SecondaryMap, SlotMap};
use tracing::debug;

use crate::cache::DistanceCache;
use crate::config::GraphConfig;
use crate::connectivity::ConnectivityGraph;
use crate::model::{EdgeKind, Minimum, MinimumId, PairKey};
use crate::oracle::DistanceOracle;
use crate::selector;
use crate::storage::StorageBackend;
use crate::tx::{self, TxMode};
use crate::Result;

pub use repair::RepairReport;

new_key_type! {
    /// Arena index of an activated minimum.
    pub struct VertexKey;
}

pub struct ProximityGraph<B, C, O> {
    backend: B,
    connectivity: C,
    cache: DistanceCache<O>,
    config: GraphConfig,
    vertices: SlotMap<VertexKey, Minimum>,
    index: HashMap<MinimumId, VertexKey>,
    adjacency: SecondaryMap<VertexKey, HashMap<VertexKey, EdgeKind>>,
    blocked: HashSet<PairKey>,
}

impl<B, C, O> ProximityGraph<B, C, O>
where
    B: StorageBackend,
    C: ConnectivityGraph,
    O: DistanceOracle,
{
    pub fn new(backend: B, connectivity: C, oracle: O, config: GraphConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cache: DistanceCache::new(oracle, config.defer_store_updates, config.flush_threshold),
            backend,
            connectivity,
            config,
            vertices: SlotMap::with_key(),
            index: HashMap::new(),
            adjacency: SecondaryMap::new(),
            blocked: HashSet::new(),
        })
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Activate a minimum and connect it to every other vertex.
    ///
    /// Vertices in the same connectivity component get a `Confirmed` edge
    /// without touching the oracle; every other vertex gets an estimated
    /// edge from the distance cache. Runs in one store transaction.
    ///
    /// Returns false if `m` was already a vertex. On failure the transaction
    /// is rolled back, the half-inserted vertex is detached again and the
    /// error is returned; the session should then be discarded.
    pub fn add_minimum(&mut self, m: &Minimum) -> Result<bool> {
        if self.index.contains_key(&m.id) {
            return Ok(false);
        }
        self.transact(|g, tx| g.insert_vertex(tx, m.clone()))?;
        Ok(true)
    }

    fn insert_vertex(&mut self, tx: &mut B::Tx, m: Minimum) -> Result<()> {
        let component = self.connectivity.connected_component(m.id);
        let id = m.id;
        let key = self.vertices.insert(m);
        self.index.insert(id, key);
        self.adjacency.insert(key, HashMap::new());

        match self.connect_new_vertex(tx, key, &component) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.detach_vertex(key);
                Err(err)
            }
        }
    }

    fn connect_new_vertex(
        &mut self,
        tx: &mut B::Tx,
        key: VertexKey,
        component: &HashSet<MinimumId>,
    ) -> Result<()> {
        let id = self.vertices[key].id;
        let others: Vec<VertexKey> = self.vertices.keys().filter(|k| *k != key).collect();

        for other in &others {
            let other_id = self.vertices[*other].id;
            if component.contains(&other_id) && !self.is_blocked(id, other_id) {
                self.set_edge(key, *other, EdgeKind::Confirmed);
            }
        }

        for other in others {
            if self.has_edge(key, other) || self.is_blocked(id, self.vertices[other].id) {
                continue;
            }
            let d = self.cache.distance(&self.backend, tx, &self.vertices[key], &self.vertices[other])?;
            let w = self.config.transform.apply(d);
            self.set_edge(key, other, EdgeKind::Estimated(w));
        }
        Ok(())
    }

    // ========================================================================
    // Removal and notification
    // ========================================================================

    /// Permanently block a pair: delete its edge and never re-create it.
    ///
    /// Returns whether an edge was deleted. Idempotent.
    pub fn remove_edge(&mut self, a: &Minimum, b: &Minimum) -> bool {
        self.blocked.insert(PairKey::new(a.id, b.id));
        let removed = match (self.key_of(a.id), self.key_of(b.id)) {
            (Some(ka), Some(kb)) => self.drop_edge(ka, kb).is_some(),
            _ => false,
        };
        debug!(a = %a.id, b = %b.id, removed, "blocked edge");
        removed
    }

    /// Record that a chain of transition states now joins `a` and `b`.
    ///
    /// The edge becomes `Confirmed`, unless the pair is blocked or either
    /// minimum is not a vertex. Returns whether the graph changed.
    pub fn set_transition_state_connection(&mut self, a: &Minimum, b: &Minimum) -> bool {
        if a.id == b.id || self.is_blocked(a.id, b.id) {
            return false;
        }
        let (Some(ka), Some(kb)) = (self.key_of(a.id), self.key_of(b.id)) else {
            return false;
        };
        if self.edge_between(ka, kb).is_some_and(|k| k.is_confirmed()) {
            return false;
        }
        self.set_edge(ka, kb, EdgeKind::Confirmed);
        true
    }

    /// Swap the connectivity graph, returning the previous one.
    pub fn replace_connectivity(&mut self, connectivity: C) -> C {
        std::mem::replace(&mut self.connectivity, connectivity)
    }

    // ========================================================================
    // Distances and persistence
    // ========================================================================

    /// Distance between two minima, through the cache.
    pub fn distance(&mut self, a: &Minimum, b: &Minimum) -> Result<f64> {
        self.transact(|g, tx| g.cache.distance(&g.backend, tx, a, b))
    }

    /// Cached distance only. Never calls the oracle.
    pub fn cached_distance(&self, a: &Minimum, b: &Minimum) -> Option<f64> {
        self.cache.cached(a, b)
    }

    /// Load every persisted distance into the cache. Returns how many were new.
    pub fn load_distances(&mut self) -> Result<usize> {
        let backend = &self.backend;
        let entries = tx::scoped(backend, TxMode::ReadOnly, |tx| backend.read_all_distances(tx))?;
        Ok(self.cache.load(entries))
    }

    /// Every minimum the store knows about.
    pub fn known_minima(&self) -> Result<Vec<Minimum>> {
        let backend = &self.backend;
        tx::scoped(backend, TxMode::ReadOnly, |tx| backend.minima(tx))
    }

    /// Minima worth activating for a `start`-`end` connection.
    pub fn select_relevant(&mut self, start: &Minimum, end: &Minimum) -> Result<Vec<Minimum>> {
        let start_end_distance = self.distance(start, end)?;
        Ok(selector::select_relevant(&self.cache, &self.connectivity, start, end, start_end_distance))
    }

    /// Flush pending distances; see `DistanceCache::flush`.
    pub fn flush(&mut self, force: bool) -> Result<usize> {
        self.cache.flush(&self.backend, force)
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    pub fn contains(&self, m: &Minimum) -> bool {
        self.index.contains_key(&m.id)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|n| n.len()).sum::<usize>() / 2
    }

    pub fn edge(&self, a: &Minimum, b: &Minimum) -> Option<EdgeKind> {
        self.edge_between(self.key_of(a.id)?, self.key_of(b.id)?)
    }

    /// Query-boundary weight: 0 for confirmed edges.
    pub fn weight(&self, a: &Minimum, b: &Minimum) -> Option<f64> {
        self.edge(a, b).map(|k| k.weight())
    }

    pub fn minima(&self) -> impl Iterator<Item = &Minimum> {
        self.vertices.values()
    }

    pub fn is_blocked(&self, a: MinimumId, b: MinimumId) -> bool {
        self.blocked.contains(&PairKey::new(a, b))
    }

    pub fn oracle_calls(&self) -> u64 {
        self.cache.oracle_calls()
    }

    pub fn pending_count(&self) -> usize {
        self.cache.pending_count()
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn connectivity(&self) -> &C {
        &self.connectivity
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Run `body` in a read-write transaction; roll back on error.
    fn transact<R>(&mut self, body: impl FnOnce(&mut Self, &mut B::Tx) -> Result<R>) -> Result<R> {
        let mut tx = self.backend.begin_tx(TxMode::ReadWrite)?;
        let outcome = body(self, &mut tx);
        tx::settle(&self.backend, tx, outcome)
    }

    fn key_of(&self, id: MinimumId) -> Option<VertexKey> {
        self.index.get(&id).copied()
    }

    fn edge_between(&self, a: VertexKey, b: VertexKey) -> Option<EdgeKind> {
        self.adjacency.get(a)?.get(&b).copied()
    }

    fn has_edge(&self, a: VertexKey, b: VertexKey) -> bool {
        self.edge_between(a, b).is_some()
    }

    fn set_edge(&mut self, a: VertexKey, b: VertexKey, kind: EdgeKind) {
        if a == b {
            return;
        }
        if let Some(n) = self.adjacency.get_mut(a) {
            n.insert(b, kind);
        }
        if let Some(n) = self.adjacency.get_mut(b) {
            n.insert(a, kind);
        }
    }

    fn drop_edge(&mut self, a: VertexKey, b: VertexKey) -> Option<EdgeKind> {
        if let Some(n) = self.adjacency.get_mut(b) {
            n.remove(&a);
        }
        self.adjacency.get_mut(a)?.remove(&b)
    }

    /// Remove a vertex and all its edges. O(degree).
    fn detach_vertex(&mut self, key: VertexKey) -> Option<(Minimum, HashMap<VertexKey, EdgeKind>)> {
        let neighbors = self.adjacency.remove(key).unwrap_or_default();
        for n in neighbors.keys() {
            if let Some(back) = self.adjacency.get_mut(*n) {
                back.remove(&key);
            }
        }
        let m = self.vertices.remove(key)?;
        self.index.remove(&m.id);
        Some((m, neighbors))
    }

    /// Every edge once, ordered by endpoint ids.
    fn edge_list(&self) -> Vec<(VertexKey, VertexKey)> {
        let mut edges: Vec<(PairKey, VertexKey, VertexKey)> = self
            .adjacency
            .iter()
            .flat_map(|(a, n)| n.keys().map(move |b| (a, *b)))
            .filter(|(a, b)| a < b)
            .map(|(a, b)| (PairKey::new(self.vertices[a].id, self.vertices[b].id), a, b))
            .collect();
        edges.sort_by_key(|(pair, _, _)| *pair);
        edges.into_iter().map(|(_, a, b)| (a, b)).collect()
    }
}
