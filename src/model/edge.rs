//! Edge kinds of the proximity graph.

use serde::{Deserialize, Serialize};

/// What an edge of the proximity graph knows about its endpoints.
///
/// `Confirmed` collapses to weight 0 at the query boundary. A confirmed edge
/// is a fact learned from the connectivity graph and is never weakened by
/// an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EdgeKind {
    /// A chain of transition states joins the endpoints.
    Confirmed,
    /// Transformed distance between the endpoints.
    Estimated(f64),
}

impl EdgeKind {
    pub fn weight(&self) -> f64 {
        match self {
            EdgeKind::Confirmed => 0.0,
            EdgeKind::Estimated(w) => *w,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, EdgeKind::Confirmed)
    }
}

/// Monotonically increasing map from raw distance to edge weight.
///
/// `Square` (the default) makes paths prefer many short hops over a few
/// long ones.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum WeightTransform {
    Linear,
    #[default]
    Square,
    /// `d^p`, `p > 0`.
    Power(f64),
}

impl WeightTransform {
    pub fn apply(&self, distance: f64) -> f64 {
        match self {
            WeightTransform::Linear => distance,
            WeightTransform::Square => distance * distance,
            WeightTransform::Power(p) => distance.powf(*p),
        }
    }
}
