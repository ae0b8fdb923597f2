//! # landscape-graph: Connection Planning over Energy-Landscape Minima
//!
//! Keeps a proximity graph over the minima of a potential-energy landscape
//! and uses it to decide which pair of minima a transition-state search
//! should try to connect next.
//!
//! ## Design Principles
//!
//! 1. **Lazy distances**: the pairwise distance oracle is expensive; every
//!    result is cached, and candidate minima are filtered using only
//!    distances that are already known.
//! 2. **Confirmed beats estimated**: an edge whose endpoints are joined by
//!    transition states weighs 0 and is never weakened by an estimate.
//! 3. **Trait-first collaborators**: `StorageBackend`, `ConnectivityGraph`
//!    and `DistanceOracle` are the contracts with the surrounding search.
//! 4. **Single-threaded, synchronous**: no internal parallelism, no locks
//!    held across calls.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use landscape_graph::{
//!     EuclideanOracle, GraphConfig, MemoryBackend, Minimum, MinimumId,
//!     RoutePlanner, TransitionStateGraph,
//! };
//!
//! # fn example() -> landscape_graph::Result<()> {
//! let store = MemoryBackend::new();
//! let ts = TransitionStateGraph::new();
//! let start = Minimum::new(MinimumId(1), -10.0, vec![0.0, 0.0]);
//! let end = Minimum::new(MinimumId(2), -9.5, vec![3.0, 4.0]);
//!
//! let mut planner = RoutePlanner::new(store, ts, EuclideanOracle, GraphConfig::default())?;
//! planner.initialize(&start, &end)?;
//!
//! if let Some((a, b, weight)) = planner.next_pair(&start, &end) {
//!     println!("try connecting {} and {} (weight {weight})", a.id, b.id);
//! }
//! planner.finish()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod config;
pub mod tx;
pub mod storage;
pub mod oracle;
pub mod cache;
pub mod connectivity;
pub mod selector;
pub mod proximity;
pub mod planner;

// ============================================================================
// Re-exports
// ============================================================================

pub use model::{Minimum, MinimumId, PairKey, EdgeKind, WeightTransform, Route};
pub use config::{GraphConfig, ActivationMode};
pub use tx::{Transaction, TxMode, TxId};
pub use storage::{StorageBackend, MemoryBackend};
pub use oracle::{Alignment, DistanceOracle, EuclideanOracle, OracleAdapter};
pub use cache::DistanceCache;
pub use connectivity::{ConnectivityGraph, TransitionStateGraph};
pub use proximity::{ProximityGraph, RepairReport, VertexKey};
pub use planner::RoutePlanner;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Oracle error: {0}")]
    OracleError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Transaction error: {0}")]
    TxError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
