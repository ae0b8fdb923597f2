//! Route planner: which pair of minima to try connecting next.
//!
//! The connect algorithm asks for the cheapest route between its two target
//! minima, tries to join the adjacent pair with the lowest nonzero weight,
//! and reports back. Successes zero the edge, failures block it, so the next
//! suggestion moves on.

use tracing::info;

use crate::config::{ActivationMode, GraphConfig};
use crate::connectivity::ConnectivityGraph;
use crate::model::{Minimum, Route};
use crate::oracle::DistanceOracle;
use crate::proximity::{ProximityGraph, RepairReport};
use crate::storage::StorageBackend;
use crate::Result;

pub struct RoutePlanner<B, C, O> {
    graph: ProximityGraph<B, C, O>,
}

impl<B, C, O> RoutePlanner<B, C, O>
where
    B: StorageBackend,
    C: ConnectivityGraph,
    O: DistanceOracle,
{
    pub fn new(backend: B, connectivity: C, oracle: O, config: GraphConfig) -> Result<Self> {
        Ok(Self { graph: ProximityGraph::new(backend, connectivity, oracle, config)? })
    }

    pub fn with_graph(graph: ProximityGraph<B, C, O>) -> Self {
        Self { graph }
    }

    /// Set up the session for connecting `start` and `end`, activating extra
    /// minima per the configured `activation` mode.
    pub fn initialize(&mut self, start: &Minimum, end: &Minimum) -> Result<()> {
        let mode = self.graph.config().activation;
        self.initialize_with_mode(start, end, mode)
    }

    /// Warm the cache from the store, activate both endpoints, then
    /// activate more minima per `mode`.
    pub fn initialize_with_mode(&mut self, start: &Minimum, end: &Minimum, mode: ActivationMode) -> Result<()> {
        let loaded = self.graph.load_distances()?;
        info!(count = loaded, "loaded distances from store");

        self.graph.distance(start, end)?;
        self.graph.add_minimum(start)?;
        self.graph.add_minimum(end)?;

        match mode {
            ActivationMode::Exhaustive => {
                info!("adding all minima to proximity graph");
                for m in self.graph.known_minima()? {
                    self.graph.add_minimum(&m)?;
                }
            }
            ActivationMode::Relevant => {
                for m in self.graph.select_relevant(start, end)? {
                    self.graph.add_minimum(&m)?;
                }
            }
            ActivationMode::EndpointsOnly => {}
        }

        self.graph.flush(false)?;
        info!(
            vertices = self.graph.vertex_count(),
            edges = self.graph.edge_count(),
            "proximity graph initialized"
        );
        Ok(())
    }

    /// Cheapest route between two activated minima, or `None`.
    pub fn shortest_path(&self, a: &Minimum, b: &Minimum) -> Option<Route> {
        self.graph.shortest_path(a, b)
    }

    /// The adjacent pair on the cheapest route with the lowest nonzero weight.
    ///
    /// `None` when there is no route, or every hop is already connected.
    pub fn next_pair(&self, a: &Minimum, b: &Minimum) -> Option<(Minimum, Minimum, f64)> {
        let route = self.graph.shortest_path(a, b)?;
        let (x, y, w) = route.lowest_nonzero_hop(self.graph.config().zero_tolerance)?;
        Some((x.clone(), y.clone(), w))
    }

    /// The caller joined `a` and `b` with transition states.
    pub fn report_success(&mut self, a: &Minimum, b: &Minimum) -> bool {
        self.graph.set_transition_state_connection(a, b)
    }

    /// The caller failed to join `a` and `b` directly; never suggest the pair again.
    pub fn report_failure(&mut self, a: &Minimum, b: &Minimum) -> bool {
        self.graph.remove_edge(a, b)
    }

    pub fn merge(&mut self, keep: &Minimum, remove: &Minimum) -> Result<()> {
        self.graph.merge(keep, remove)
    }

    pub fn check(&mut self) -> Result<RepairReport> {
        self.graph.repair()
    }

    /// Flush every pending distance. Call before dropping the planner.
    pub fn finish(&mut self) -> Result<usize> {
        self.graph.flush(true)
    }

    pub fn graph(&self) -> &ProximityGraph<B, C, O> {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut ProximityGraph<B, C, O> {
        &mut self.graph
    }

    pub fn into_graph(self) -> ProximityGraph<B, C, O> {
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::TransitionStateGraph;
    use crate::model::MinimumId;
    use crate::oracle::EuclideanOracle;
    use crate::storage::MemoryBackend;

    fn m(id: u64, x: f64) -> Minimum {
        Minimum::new(MinimumId(id), 0.0, vec![x])
    }

    fn planner(minima: &[Minimum]) -> (RoutePlanner<MemoryBackend, TransitionStateGraph, EuclideanOracle>, MemoryBackend) {
        let store = MemoryBackend::new();
        let ts = TransitionStateGraph::new();
        for x in minima {
            store.add_minimum(x.clone());
            ts.add_minimum(x.clone());
        }
        let p = RoutePlanner::new(store.clone(), ts, EuclideanOracle, GraphConfig::default()).unwrap();
        (p, store)
    }

    #[test]
    fn test_endpoints_only() {
        let minima = [m(1, 0.0), m(2, 1.0), m(3, 4.0)];
        let (mut p, _) = planner(&minima);
        p.initialize_with_mode(&minima[0], &minima[2], ActivationMode::EndpointsOnly).unwrap();
        assert_eq!(p.graph().vertex_count(), 2);
        assert_eq!(p.graph().oracle_calls(), 1);
    }

    #[test]
    fn test_exhaustive_activates_everything() {
        let minima = [m(1, 0.0), m(2, 1.0), m(3, 4.0), m(4, 9.0)];
        let (mut p, _) = planner(&minima);
        p.initialize_with_mode(&minima[0], &minima[2], ActivationMode::Exhaustive).unwrap();
        assert_eq!(p.graph().vertex_count(), 4);
        assert_eq!(p.graph().edge_count(), 6);
    }

    #[test]
    fn test_next_pair_and_reports() {
        let minima = [m(1, 0.0), m(2, 1.0), m(3, 3.0)];
        let (mut p, _) = planner(&minima);
        p.initialize_with_mode(&minima[0], &minima[2], ActivationMode::Exhaustive).unwrap();

        // Route 1-2-3 with weights [1, 4]: try 1-2 first.
        let (a, b, w) = p.next_pair(&minima[0], &minima[2]).unwrap();
        assert_eq!((a.id, b.id, w), (MinimumId(1), MinimumId(2), 1.0));

        assert!(p.report_success(&a, &b));
        let (a, b, _) = p.next_pair(&minima[0], &minima[2]).unwrap();
        assert_eq!((a.id, b.id), (MinimumId(2), MinimumId(3)));

        assert!(p.report_failure(&a, &b));
        let route = p.shortest_path(&minima[0], &minima[2]).unwrap();
        assert_eq!(route.weights, vec![9.0]);
    }

    #[test]
    fn test_finish_flushes_everything() {
        let minima = [m(1, 0.0), m(2, 1.0)];
        let (mut p, store) = planner(&minima);
        p.initialize_with_mode(&minima[0], &minima[1], ActivationMode::EndpointsOnly).unwrap();
        assert_eq!(store.distance_count(), 0);
        assert_eq!(p.finish().unwrap(), 1);
        assert_eq!(store.distance_count(), 1);
    }
}
