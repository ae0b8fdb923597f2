//! Distance oracle: the injected, expensive pairwise distance.
//!
//! The oracle typically aligns two structures before measuring them
//! (permutations, rotations, translations), which is why it also returns
//! aligned coordinates. The graph only keeps the distance.

use tracing::debug;

use crate::model::Minimum;
use crate::{Error, Result};

/// Result of one oracle evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub distance: f64,
    pub aligned_a: Vec<f64>,
    pub aligned_b: Vec<f64>,
}

/// Symmetric, deterministic pairwise distance between two coordinate sets.
pub trait DistanceOracle {
    fn distance(&self, a: &[f64], b: &[f64]) -> Result<Alignment>;
}

impl<F> DistanceOracle for F
where
    F: Fn(&[f64], &[f64]) -> Result<Alignment>,
{
    fn distance(&self, a: &[f64], b: &[f64]) -> Result<Alignment> {
        self(a, b)
    }
}

/// Plain Euclidean distance without any alignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanOracle;

impl DistanceOracle for EuclideanOracle {
    fn distance(&self, a: &[f64], b: &[f64]) -> Result<Alignment> {
        if a.len() != b.len() {
            return Err(Error::OracleError(format!(
                "coordinate length mismatch: {} vs {}", a.len(), b.len()
            )));
        }
        let distance = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt();
        Ok(Alignment { distance, aligned_a: a.to_vec(), aligned_b: b.to_vec() })
    }
}

// ============================================================================
// OracleAdapter
// ============================================================================

/// Wraps an oracle: validates its output and counts calls. Does not cache.
pub struct OracleAdapter<O> {
    oracle: O,
    calls: u64,
}

impl<O: DistanceOracle> OracleAdapter<O> {
    pub fn new(oracle: O) -> Self {
        Self { oracle, calls: 0 }
    }

    /// Evaluate the distance between two minima.
    ///
    /// Fails with `OracleError` if the oracle fails or reports a negative or
    /// non-finite distance.
    pub fn evaluate(&mut self, a: &Minimum, b: &Minimum) -> Result<f64> {
        self.calls += 1;
        let Alignment { distance, .. } = self.oracle.distance(&a.coords, &b.coords)?;
        if !distance.is_finite() || distance < 0.0 {
            return Err(Error::OracleError(format!(
                "invalid distance {distance} between {} and {}", a.id, b.id
            )));
        }
        debug!(a = %a.id, b = %b.id, distance, "calculated distance");
        Ok(distance)
    }

    /// Total number of oracle invocations, failed ones included.
    pub fn calls(&self) -> u64 {
        self.calls
    }
}
