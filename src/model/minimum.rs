//! Minimum: a local optimum of the energy landscape.

use serde::{Deserialize, Serialize};

/// Stable identifier of a minimum, assigned by the external store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MinimumId(pub u64);

impl std::fmt::Display for MinimumId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A minimum as seen by the distance graph.
///
/// Owned by the external store; the graph only uses it as a vertex and as an
/// oracle argument. Equality and hashing go through `id` only, so two values
/// with the same id but different coordinates are the same vertex.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Minimum {
    pub id: MinimumId,
    pub energy: f64,
    pub coords: Vec<f64>,
}

impl Minimum {
    pub fn new(id: MinimumId, energy: f64, coords: Vec<f64>) -> Self {
        Self { id, energy, coords }
    }
}

impl PartialEq for Minimum {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Minimum {}

impl std::hash::Hash for Minimum {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
