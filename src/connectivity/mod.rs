//! # Connectivity Graph
//!
//! The external graph of confirmed transition-state connections. The
//! distance graph only reads it: two minima are *connected* when a chain of
//! transition states joins them.

pub mod memory;

use hashbrown::HashSet;

use crate::model::{Minimum, MinimumId};

pub use memory::TransitionStateGraph;

/// Read-only view of confirmed connectivity.
pub trait ConnectivityGraph {
    /// Whether a chain of transition states joins `a` and `b`.
    fn are_connected(&self, a: MinimumId, b: MinimumId) -> bool;

    /// Every minimum reachable from `m`, `m` included. Empty if `m` is unknown.
    fn connected_component(&self, m: MinimumId) -> HashSet<MinimumId>;

    /// Every minimum known to the graph.
    fn minima(&self) -> Vec<Minimum>;
}
