//! Merging two vertices discovered to be the same minimum.

use tracing::debug;

use crate::connectivity::ConnectivityGraph;
use crate::model::{EdgeKind, Minimum};
use crate::oracle::DistanceOracle;
use crate::storage::StorageBackend;
use crate::Result;
use super::{ProximityGraph, VertexKey};

impl<B, C, O> ProximityGraph<B, C, O>
where
    B: StorageBackend,
    C: ConnectivityGraph,
    O: DistanceOracle,
{
    /// Fold `remove` into `keep`.
    ///
    /// Every edge `(remove, x)` is re-targeted to `(keep, x)`, except that a
    /// zero-weight edge `(keep, x)` is never overwritten by an estimate and
    /// blocked pairs stay absent. A `Confirmed` edge `(keep, x)` is never
    /// overwritten at all. The `(keep, remove)` edge disappears with `remove`.
    ///
    /// If `remove` is not a vertex this is a no-op. If only `remove` is a
    /// vertex, it is re-bound to `keep` with all its edges. Runs `repair()`
    /// afterwards when `repair_after_merge` is set.
    pub fn merge(&mut self, keep: &Minimum, remove: &Minimum) -> Result<()> {
        if keep.id == remove.id {
            return Ok(());
        }
        let Some(removed_key) = self.key_of(remove.id) else {
            return Ok(());
        };
        debug!(keep = %keep.id, remove = %remove.id, "merging minima");

        match self.key_of(keep.id) {
            None => {
                self.index.remove(&remove.id);
                self.index.insert(keep.id, removed_key);
                self.vertices[removed_key] = keep.clone();
                let blocked: Vec<_> = self
                    .adjacency
                    .get(removed_key)
                    .into_iter()
                    .flat_map(|n| n.keys().copied())
                    .filter(|other| self.is_blocked(keep.id, self.vertices[*other].id))
                    .collect();
                for other in blocked {
                    self.drop_edge(removed_key, other);
                }
            }
            Some(kept_key) => {
                let Some((_, neighbors)) = self.detach_vertex(removed_key) else {
                    return Ok(());
                };
                for (other, kind) in neighbors {
                    if other == kept_key || self.is_blocked(keep.id, self.vertices[other].id) {
                        continue;
                    }
                    if self.keeps_existing(kept_key, other, kind) {
                        continue;
                    }
                    self.set_edge(kept_key, other, kind);
                }
            }
        }

        if self.config.repair_after_merge {
            self.repair()?;
        }
        Ok(())
    }

    /// Whether the edge `(kept, other)` already beats `incoming`.
    fn keeps_existing(&self, kept: VertexKey, other: VertexKey, incoming: EdgeKind) -> bool {
        match self.edge_between(kept, other) {
            Some(EdgeKind::Confirmed) => true,
            Some(existing) => !incoming.is_confirmed() && existing.weight() <= self.config.zero_tolerance,
            None => false,
        }
    }
}
