//! Distance cache: memoized oracle results with deferred persistence.
//!
//! A cache hit is authoritative: once a pair has a distance the oracle is
//! never asked about it again. New distances either go to a pending buffer
//! that is flushed to the store in one batch, or are written through under
//! the caller's transaction when deferral is off.

use hashbrown::HashMap;
use tracing::info;

use crate::model::{Minimum, PairKey};
use crate::oracle::{DistanceOracle, OracleAdapter};
use crate::storage::StorageBackend;
use crate::tx::{self, TxMode};
use crate::Result;

pub struct DistanceCache<O> {
    adapter: OracleAdapter<O>,
    distances: HashMap<PairKey, f64>,
    pending: Vec<(PairKey, f64)>,
    defer: bool,
    flush_threshold: usize,
}

impl<O: DistanceOracle> DistanceCache<O> {
    pub fn new(oracle: O, defer: bool, flush_threshold: usize) -> Self {
        Self {
            adapter: OracleAdapter::new(oracle),
            distances: HashMap::new(),
            pending: Vec::new(),
            defer,
            flush_threshold,
        }
    }

    /// Cached distance only. Never calls the oracle.
    pub fn cached(&self, a: &Minimum, b: &Minimum) -> Option<f64> {
        self.distances.get(&PairKey::new(a.id, b.id)).copied()
    }

    /// Distance between two minima, calling the oracle on a miss.
    ///
    /// The distance of a minimum to itself is 0 and is not stored.
    pub fn distance<B: StorageBackend>(
        &mut self,
        backend: &B,
        tx: &mut B::Tx,
        a: &Minimum,
        b: &Minimum,
    ) -> Result<f64> {
        let key = PairKey::new(a.id, b.id);
        if key.is_self_pair() {
            return Ok(0.0);
        }
        if let Some(d) = self.distances.get(&key) {
            return Ok(*d);
        }

        let d = self.adapter.evaluate(a, b)?;
        if self.defer {
            self.pending.push((key, d));
        } else {
            backend.write_distance(tx, key, d)?;
        }
        self.distances.insert(key, d);
        Ok(d)
    }

    /// Seed the cache with already-persisted distances. Seeded entries are
    /// not pending.
    pub fn load(&mut self, entries: impl IntoIterator<Item = (PairKey, f64)>) -> usize {
        let before = self.distances.len();
        for (key, d) in entries {
            self.distances.entry(key).or_insert(d);
        }
        self.distances.len() - before
    }

    /// Write pending distances in one batch if there are at least
    /// `flush_threshold` of them, or any at all when `force` is set.
    ///
    /// Returns the number written. On failure the buffer is kept intact so
    /// a later flush can retry.
    pub fn flush<B: StorageBackend>(&mut self, backend: &B, force: bool) -> Result<usize> {
        let n = self.pending.len();
        if n == 0 || (!force && n < self.flush_threshold) {
            return Ok(0);
        }
        tx::scoped(backend, TxMode::ReadWrite, |tx| {
            backend.write_distances_batch(tx, &self.pending)
        })?;
        self.pending.clear();
        info!(count = n, "updated store with new distances");
        Ok(n)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn oracle_calls(&self) -> u64 {
        self.adapter.calls()
    }
}
