//! Unordered pair of minima, used as the key for distances.

use serde::{Deserialize, Serialize};
use super::MinimumId;

/// Canonical unordered pair: `lo <= hi`, so `(a, b)` and `(b, a)` are the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    lo: MinimumId,
    hi: MinimumId,
}

impl PairKey {
    pub fn new(a: MinimumId, b: MinimumId) -> Self {
        if a <= b { Self { lo: a, hi: b } } else { Self { lo: b, hi: a } }
    }

    pub fn lo(&self) -> MinimumId {
        self.lo
    }

    pub fn hi(&self) -> MinimumId {
        self.hi
    }

    pub fn is_self_pair(&self) -> bool {
        self.lo == self.hi
    }
}

impl std::fmt::Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lo, self.hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_order_independent() {
        let ab = PairKey::new(MinimumId(3), MinimumId(1));
        let ba = PairKey::new(MinimumId(1), MinimumId(3));
        assert_eq!(ab, ba);
        assert_eq!(ab.lo(), MinimumId(1));
        assert_eq!(ab.hi(), MinimumId(3));
    }

    #[test]
    fn test_self_pair() {
        assert!(!PairKey::new(MinimumId(2), MinimumId(5)).is_self_pair());
        assert!(PairKey::new(MinimumId(4), MinimumId(4)).is_self_pair());
    }
}
