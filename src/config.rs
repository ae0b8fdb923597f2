//! Session configuration.

use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::model::WeightTransform;
use crate::{Error, Result};

/// Which minima `initialize` activates besides the two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActivationMode {
    /// Every minimum in the store. Costs one distance per pair.
    Exhaustive,
    /// Only minima that pass the triangle-inequality filter.
    #[default]
    Relevant,
    /// Just start and end.
    EndpointsOnly,
}

/// Tunables for a distance-graph session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Buffer new distances and write them in batches.
    pub defer_store_updates: bool,
    /// Minimum number of pending distances before a non-forced flush writes.
    pub flush_threshold: usize,
    pub transform: WeightTransform,
    /// A path whose total weight is at or below this is a zero-weight path.
    pub zero_tolerance: f64,
    pub activation: ActivationMode,
    pub repair_after_merge: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            defer_store_updates: true,
            flush_threshold: 300,
            transform: WeightTransform::Square,
            zero_tolerance: 1e-10,
            activation: ActivationMode::Relevant,
            repair_after_merge: true,
        }
    }
}

impl GraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if let WeightTransform::Power(p) = self.transform {
            if !(p.is_finite() && p > 0.0) {
                return Err(Error::ConfigError(format!(
                    "weight transform power must be positive and finite, got {p}"
                )));
            }
        }
        if !(self.zero_tolerance.is_finite() && self.zero_tolerance >= 0.0) {
            return Err(Error::ConfigError(format!(
                "zero_tolerance must be non-negative and finite, got {}", self.zero_tolerance
            )));
        }
        Ok(())
    }

    pub fn with_defer_store_updates(mut self, defer: bool) -> Self {
        self.defer_store_updates = defer;
        self
    }

    pub fn with_flush_threshold(mut self, threshold: usize) -> Self {
        self.flush_threshold = threshold;
        self
    }

    pub fn with_transform(mut self, transform: WeightTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_zero_tolerance(mut self, tolerance: f64) -> Self {
        self.zero_tolerance = tolerance;
        self
    }

    pub fn with_activation(mut self, mode: ActivationMode) -> Self {
        self.activation = mode;
        self
    }

    pub fn with_repair_after_merge(mut self, repair: bool) -> Self {
        self.repair_after_merge = repair;
        self
    }
}
