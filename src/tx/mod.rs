//! Transaction management.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::StorageBackend;
use crate::Result;

/// Transaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxMode {
    ReadOnly,
    ReadWrite,
}

/// Opaque transaction identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId(pub u64);

impl std::fmt::Display for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction trait that all backends must implement.
pub trait Transaction {
    fn mode(&self) -> TxMode;
    fn id(&self) -> TxId;
}

/// Run `body` inside a transaction: begin, body, commit.
///
/// On any failure of `body` the transaction is rolled back and the original
/// error is returned. A failing rollback is logged, never allowed to mask
/// the error that caused it.
pub fn scoped<B, R, F>(backend: &B, mode: TxMode, body: F) -> Result<R>
where
    B: StorageBackend,
    F: FnOnce(&mut B::Tx) -> Result<R>,
{
    let mut tx = backend.begin_tx(mode)?;
    let outcome = body(&mut tx);
    settle(backend, tx, outcome)
}

/// Commit `tx` if `outcome` succeeded, otherwise roll it back and return
/// the error from `outcome`.
pub(crate) fn settle<B: StorageBackend, R>(backend: &B, tx: B::Tx, outcome: Result<R>) -> Result<R> {
    match outcome {
        Ok(value) => {
            backend.commit_tx(tx)?;
            Ok(value)
        }
        Err(err) => {
            rollback_quietly(backend, tx);
            Err(err)
        }
    }
}

/// Roll back, logging instead of propagating a rollback failure.
fn rollback_quietly<B: StorageBackend>(backend: &B, tx: B::Tx) {
    let id = tx.id();
    if let Err(rb) = backend.rollback_tx(tx) {
        warn!(tx = %id, error = %rb, "rollback failed");
    }
}
