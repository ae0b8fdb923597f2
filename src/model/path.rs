//! Route: a weighted path through the proximity graph.

use serde::{Deserialize, Serialize};
use super::Minimum;

/// A path minimum -[w]- minimum -[w]- minimum ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Minima along the path. Always has one more element than `weights`.
    pub minima: Vec<Minimum>,
    /// Weight of the edge between `minima[i]` and `minima[i + 1]`.
    pub weights: Vec<f64>,
}

impl Route {
    pub fn single(minimum: Minimum) -> Self {
        Self { minima: vec![minimum], weights: Vec::new() }
    }

    /// Number of hops.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn start(&self) -> Option<&Minimum> {
        self.minima.first()
    }

    pub fn end(&self) -> Option<&Minimum> {
        self.minima.last()
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Extend the route with an edge weight and the minimum it leads to.
    pub fn append(&mut self, weight: f64, minimum: Minimum) {
        self.weights.push(weight);
        self.minima.push(minimum);
    }

    /// Adjacent pair with the lowest weight above `tolerance`.
    ///
    /// Hops at or below `tolerance` are already connected and need no work.
    pub fn lowest_nonzero_hop(&self, tolerance: f64) -> Option<(&Minimum, &Minimum, f64)> {
        self.weights
            .iter()
            .enumerate()
            .filter(|(_, w)| **w > tolerance)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, w)| (&self.minima[i], &self.minima[i + 1], *w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MinimumId;

    fn m(id: u64) -> Minimum {
        Minimum::new(MinimumId(id), 0.0, vec![id as f64])
    }

    #[test]
    fn test_append_and_total() {
        let mut route = Route::single(m(1));
        assert!(route.is_empty());
        route.append(4.0, m(2));
        route.append(1.0, m(3));
        assert_eq!(route.len(), 2);
        assert_eq!(route.total_weight(), 5.0);
        assert_eq!(route.start().map(|x| x.id), Some(MinimumId(1)));
        assert_eq!(route.end().map(|x| x.id), Some(MinimumId(3)));
    }

    #[test]
    fn test_lowest_nonzero_hop_skips_connected() {
        let route = Route {
            minima: vec![m(1), m(2), m(3), m(4)],
            weights: vec![0.0, 9.0, 2.5],
        };
        let (a, b, w) = route.lowest_nonzero_hop(1e-10).unwrap();
        assert_eq!((a.id, b.id, w), (MinimumId(3), MinimumId(4), 2.5));

        let connected = Route { minima: vec![m(1), m(2)], weights: vec![0.0] };
        assert!(connected.lowest_nonzero_hop(1e-10).is_none());
    }
}
