//! In-memory storage backend.
//!
//! This is the reference implementation of `StorageBackend`.
//! It uses simple HashMaps protected by RwLock.
//!
//! ## Semantics
//!
//! - **Staged transactions**: writes are buffered on the `MemoryTx` handle and
//!   only become visible on `commit_tx()`. `rollback_tx()` discards them.
//! - **Read-only handles reject writes** with `Error::TxError`.
//! - **Availability switch**: `set_available(false)` makes every store call
//!   fail with `Error::StorageError`, to exercise rollback paths.
//!
//! Use this backend for:
//! - Testing the distance graph without a database
//! - Embedding in applications that don't need persistence across runs

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::model::{Minimum, MinimumId, PairKey};
use crate::tx::{Transaction, TxMode, TxId};
use crate::{Error, Result};
use super::StorageBackend;

// ============================================================================
// MemoryBackend
// ============================================================================

/// In-memory landscape store. Cloning yields another handle to the same data.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    minima: RwLock<HashMap<MinimumId, Minimum>>,
    distances: RwLock<HashMap<PairKey, f64>>,
    next_tx_id: AtomicU64,
    /// Number of committed transactions that carried at least one write.
    committed_batches: AtomicU64,
    unavailable: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a minimum, replacing any previous one with the same id.
    pub fn add_minimum(&self, minimum: Minimum) {
        self.inner.minima.write().insert(minimum.id, minimum);
    }

    /// Committed distance for a pair, bypassing transactions.
    pub fn distance(&self, pair: PairKey) -> Option<f64> {
        self.inner.distances.read().get(&pair).copied()
    }

    pub fn distance_count(&self) -> usize {
        self.inner.distances.read().len()
    }

    pub fn committed_batches(&self) -> u64 {
        self.inner.committed_batches.load(Ordering::Relaxed)
    }

    /// Simulate the store going away (or coming back).
    pub fn set_available(&self, available: bool) {
        self.inner.unavailable.store(!available, Ordering::Relaxed);
    }

    fn ensure_available(&self) -> Result<()> {
        if self.inner.unavailable.load(Ordering::Relaxed) {
            return Err(Error::StorageError("memory backend unavailable".into()));
        }
        Ok(())
    }
}

// ============================================================================
// MemoryTx
// ============================================================================

/// In-memory transaction: a staging buffer for distance writes.
pub struct MemoryTx {
    id: TxId,
    mode: TxMode,
    staged: Vec<(PairKey, f64)>,
}

impl MemoryTx {
    /// Writes staged so far and not yet committed.
    pub fn staged(&self) -> &[(PairKey, f64)] {
        &self.staged
    }
}

impl Transaction for MemoryTx {
    fn mode(&self) -> TxMode { self.mode }
    fn id(&self) -> TxId { self.id }
}

// ============================================================================
// StorageBackend impl
// ============================================================================

impl StorageBackend for MemoryBackend {
    type Tx = MemoryTx;

    fn begin_tx(&self, mode: TxMode) -> Result<MemoryTx> {
        self.ensure_available()?;
        let id = TxId(self.inner.next_tx_id.fetch_add(1, Ordering::Relaxed) + 1);
        Ok(MemoryTx { id, mode, staged: Vec::new() })
    }

    fn commit_tx(&self, tx: MemoryTx) -> Result<()> {
        self.ensure_available()?;
        if tx.staged.is_empty() {
            return Ok(());
        }
        let mut distances = self.inner.distances.write();
        for (pair, d) in tx.staged {
            distances.insert(pair, d);
        }
        self.inner.committed_batches.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Drops the staged writes. Never fails, so rollback works even while
    /// the backend is marked unavailable.
    fn rollback_tx(&self, _tx: MemoryTx) -> Result<()> {
        Ok(())
    }

    fn write_distances_batch(&self, tx: &mut MemoryTx, batch: &[(PairKey, f64)]) -> Result<()> {
        self.ensure_available()?;
        if tx.mode == TxMode::ReadOnly {
            return Err(Error::TxError(format!("write under read-only transaction {}", tx.id)));
        }
        tx.staged.extend_from_slice(batch);
        Ok(())
    }

    fn read_all_distances(&self, _tx: &MemoryTx) -> Result<Vec<(PairKey, f64)>> {
        self.ensure_available()?;
        Ok(self.inner.distances.read().iter().map(|(k, v)| (*k, *v)).collect())
    }

    fn minima(&self, _tx: &MemoryTx) -> Result<Vec<Minimum>> {
        self.ensure_available()?;
        let mut all: Vec<Minimum> = self.inner.minima.read().values().cloned().collect();
        all.sort_by_key(|m| m.id);
        Ok(all)
    }
}

// ============================================================================
// Tests
// ============================================================================
