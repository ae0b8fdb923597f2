//! Consistency repair between the proximity graph and the connectivity graph.

use tracing::{debug, info, warn};

use crate::connectivity::ConnectivityGraph;
use crate::model::EdgeKind;
use crate::oracle::DistanceOracle;
use crate::storage::StorageBackend;
use crate::Result;
use super::ProximityGraph;

/// What one `repair()` pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Edges looked at.
    pub inspected: usize,
    /// Estimated edges turned `Confirmed` because their endpoints are connected.
    pub confirmed: usize,
    /// `Confirmed` edges given back a distance because their endpoints are not connected.
    pub restored: usize,
    /// Connected endpoints that had no zero-weight path at all before the pass.
    pub inconsistencies: usize,
}

impl RepairReport {
    /// Number of edges whose kind changed.
    pub fn changes(&self) -> usize {
        self.confirmed + self.restored
    }
}

impl<B, C, O> ProximityGraph<B, C, O>
where
    B: StorageBackend,
    C: ConnectivityGraph,
    O: DistanceOracle,
{
    /// Reconcile every edge with the connectivity graph.
    ///
    /// - connected, but estimated: becomes `Confirmed`. If no zero-weight
    ///   path joined the endpoints either, it also counts as an inconsistency.
    /// - not connected, but `Confirmed`: the distance is looked up (oracle on
    ///   a miss) and the edge gets its estimated weight back.
    ///
    /// Drift is corrected and logged, never returned as an error. Running it
    /// twice in a row changes nothing the second time.
    pub fn repair(&mut self) -> Result<RepairReport> {
        self.transact(|g, tx| g.repair_in(tx))
    }

    fn repair_in(&mut self, tx: &mut B::Tx) -> Result<RepairReport> {
        let mut report = RepairReport::default();
        let tolerance = self.config.zero_tolerance;

        for (a, b) in self.edge_list() {
            let Some(kind) = self.edge_between(a, b) else { continue };
            report.inspected += 1;
            let (ia, ib) = (self.vertices[a].id, self.vertices[b].id);
            let connected = self.connectivity.are_connected(ia, ib);

            match (connected, kind) {
                (true, EdgeKind::Estimated(w)) => {
                    let zero_path = self.path_weight(a, b).is_some_and(|total| total <= tolerance);
                    if !zero_path {
                        report.inconsistencies += 1;
                        debug!(a = %ia, b = %ib, weight = w, "connected but no zero-weight path");
                    }
                    self.set_edge(a, b, EdgeKind::Confirmed);
                    report.confirmed += 1;
                }
                (false, EdgeKind::Confirmed) => {
                    let d = self.cache.distance(&self.backend, tx, &self.vertices[a], &self.vertices[b])?;
                    let w = self.config.transform.apply(d);
                    debug!(a = %ia, b = %ib, distance = d, "not connected but zero weight");
                    self.set_edge(a, b, EdgeKind::Estimated(w));
                    report.restored += 1;
                }
                _ => {}
            }
        }

        if report.inconsistencies > 0 {
            warn!(count = report.inconsistencies, "found inconsistencies in proximity graph");
        }
        info!(
            inspected = report.inspected,
            confirmed = report.confirmed,
            restored = report.restored,
            "checked proximity graph"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GraphConfig;
    use crate::connectivity::TransitionStateGraph;
    use crate::model::{EdgeKind, Minimum, MinimumId};
    use crate::oracle::EuclideanOracle;
    use crate::proximity::ProximityGraph;
    use crate::storage::MemoryBackend;
    use pretty_assertions::assert_eq;

    fn m(id: u64, x: f64) -> Minimum {
        Minimum::new(MinimumId(id), 0.0, vec![x])
    }

    fn setup(minima: &[Minimum]) -> (ProximityGraph<MemoryBackend, TransitionStateGraph, EuclideanOracle>, TransitionStateGraph) {
        let ts = TransitionStateGraph::new();
        for x in minima {
            ts.add_minimum(x.clone());
        }
        let mut g = ProximityGraph::new(MemoryBackend::new(), ts.clone(), EuclideanOracle, GraphConfig::default()).unwrap();
        for x in minima {
            g.add_minimum(x).unwrap();
        }
        (g, ts)
    }

    #[test]
    fn test_stale_weight_is_zeroed() {
        let minima = [m(1, 0.0), m(2, 3.0)];
        let (mut g, ts) = setup(&minima);
        ts.add_transition_state(MinimumId(1), MinimumId(2));

        let report = g.repair().unwrap();
        assert_eq!(report.confirmed, 1);
        assert_eq!(report.inconsistencies, 1);
        assert_eq!(g.weight(&minima[0], &minima[1]), Some(0.0));
    }

    #[test]
    fn test_benign_when_zero_path_exists() {
        let minima = [m(1, 0.0), m(2, 1.0), m(3, 2.0)];
        let (mut g, ts) = setup(&minima);
        ts.add_transition_state(MinimumId(1), MinimumId(2));
        ts.add_transition_state(MinimumId(2), MinimumId(3));
        g.set_transition_state_connection(&minima[0], &minima[1]);
        g.set_transition_state_connection(&minima[1], &minima[2]);

        let report = g.repair().unwrap();
        assert_eq!(report.inconsistencies, 0);
        assert_eq!(report.confirmed, 1);
        assert_eq!(g.edge(&minima[0], &minima[2]), Some(EdgeKind::Confirmed));
    }

    #[test]
    fn test_unconnected_zero_weight_is_restored() {
        let minima = [m(1, 0.0), m(2, 3.0)];
        let (mut g, _) = setup(&minima);
        g.set_transition_state_connection(&minima[0], &minima[1]);

        let report = g.repair().unwrap();
        assert_eq!(report.restored, 1);
        assert_eq!(g.weight(&minima[0], &minima[1]), Some(9.0));
    }

    #[test]
    fn test_repair_is_idempotent() {
        let minima = [m(1, 0.0), m(2, 1.0), m(3, 5.0), m(4, 6.0)];
        let (mut g, ts) = setup(&minima);
        ts.add_transition_state(MinimumId(1), MinimumId(3));
        g.set_transition_state_connection(&minima[1], &minima[3]);

        let first = g.repair().unwrap();
        assert!(first.changes() > 0);
        let second = g.repair().unwrap();
        assert_eq!(second.changes(), 0);
        assert_eq!(second.inspected, 6);
    }
}
