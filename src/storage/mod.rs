//! # Storage Backend Trait
//!
//! The contract between the distance graph and the persisted landscape
//! database. The graph only needs three things from a store: transactions,
//! batched distance writes and a full distance read for warm starts.
//! Minima and transition states are owned by the store; how they are
//! persisted is none of this crate's business.
//!
//! ## Implementations
//!
//! | Backend | Module | Description |
//! |---------|--------|-------------|
//! | `MemoryBackend` | `memory` | In-memory with staged transactions, for testing/embedding |

pub mod memory;

use crate::model::{Minimum, PairKey};
use crate::tx::{Transaction, TxMode};
use crate::Result;

pub use memory::MemoryBackend;

/// The persistence contract.
///
/// Every write happens under a transaction handle. A backend must apply a
/// batch atomically with the transaction: after `rollback_tx` none of the
/// writes made under that handle are visible.
pub trait StorageBackend {
    /// The transaction type for this backend.
    type Tx: Transaction;

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Begin a new transaction.
    fn begin_tx(&self, mode: TxMode) -> Result<Self::Tx>;

    /// Commit a transaction.
    fn commit_tx(&self, tx: Self::Tx) -> Result<()>;

    /// Roll back a transaction.
    fn rollback_tx(&self, tx: Self::Tx) -> Result<()>;

    // ========================================================================
    // Distances
    // ========================================================================

    /// Write a batch of distances in one round-trip.
    fn write_distances_batch(&self, tx: &mut Self::Tx, batch: &[(PairKey, f64)]) -> Result<()>;

    /// Write a single distance.
    ///
    /// Default falls back to a batch of one.
    fn write_distance(&self, tx: &mut Self::Tx, pair: PairKey, distance: f64) -> Result<()> {
        self.write_distances_batch(tx, &[(pair, distance)])
    }

    /// Every persisted distance. Used once per session to warm the cache.
    fn read_all_distances(&self, tx: &Self::Tx) -> Result<Vec<(PairKey, f64)>>;

    // ========================================================================
    // Minima
    // ========================================================================

    /// Every minimum the store knows about.
    fn minima(&self, tx: &Self::Tx) -> Result<Vec<Minimum>>;
}
