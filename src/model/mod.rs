//! # Landscape Model
//!
//! Plain data shared by every layer: minima, pair keys, edge kinds and routes.
//!
//! Design rule: no storage handles, no oracle, no graph state here.
//! This module is pure data.

pub mod minimum;
pub mod pair;
pub mod edge;
pub mod path;

pub use minimum::{Minimum, MinimumId};
pub use pair::PairKey;
pub use edge::{EdgeKind, WeightTransform};
pub use path::Route;
