//! Shortest weighted path (Dijkstra) over the proximity graph.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use slotmap::SecondaryMap;
use tracing::debug;

use crate::connectivity::ConnectivityGraph;
use crate::model::{Minimum, Route};
use crate::oracle::DistanceOracle;
use crate::storage::StorageBackend;
use super::{ProximityGraph, VertexKey};

/// Heap entry. Reversed so `BinaryHeap` pops the cheapest vertex first.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    cost: f64,
    key: VertexKey,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.total_cmp(&self.cost).then_with(|| other.key.cmp(&self.key))
    }
}

impl<B, C, O> ProximityGraph<B, C, O>
where
    B: StorageBackend,
    C: ConnectivityGraph,
    O: DistanceOracle,
{
    /// Minimum total-weight path from `a` to `b`.
    ///
    /// `None` when the two are in different components of this graph, or
    /// when either is not a vertex. `shortest_path(m, m)` is the one-vertex
    /// route.
    pub fn shortest_path(&self, a: &Minimum, b: &Minimum) -> Option<Route> {
        debug!(vertices = self.vertex_count(), edges = self.edge_count(), "shortest path query");
        let (source, target) = (self.key_of(a.id)?, self.key_of(b.id)?);
        let keys = self.dijkstra(source, target)?;

        let mut route = Route::single(self.vertices[keys[0]].clone());
        for hop in keys.windows(2) {
            let weight = self.edge_between(hop[0], hop[1])?.weight();
            route.append(weight, self.vertices[hop[1]].clone());
        }
        Some(route)
    }

    /// Total weight of the shortest path between two vertices.
    pub(super) fn path_weight(&self, source: VertexKey, target: VertexKey) -> Option<f64> {
        let keys = self.dijkstra(source, target)?;
        keys.windows(2)
            .map(|hop| self.edge_between(hop[0], hop[1]).map(|k| k.weight()))
            .sum()
    }

    /// Vertex sequence of a cheapest path, `source` and `target` included.
    fn dijkstra(&self, source: VertexKey, target: VertexKey) -> Option<Vec<VertexKey>> {
        let mut cost: SecondaryMap<VertexKey, f64> = SecondaryMap::new();
        let mut prev: SecondaryMap<VertexKey, VertexKey> = SecondaryMap::new();
        let mut heap = BinaryHeap::new();

        cost.insert(source, 0.0);
        heap.push(Frontier { cost: 0.0, key: source });

        while let Some(Frontier { cost: c, key }) = heap.pop() {
            if key == target {
                break;
            }
            if cost.get(key).is_some_and(|best| c > *best) {
                continue;
            }
            let Some(neighbors) = self.adjacency.get(key) else { continue };
            for (next, kind) in neighbors {
                let candidate = c + kind.weight();
                if cost.get(*next).is_none_or(|best| candidate < *best) {
                    cost.insert(*next, candidate);
                    prev.insert(*next, key);
                    heap.push(Frontier { cost: candidate, key: *next });
                }
            }
        }

        if !cost.contains_key(target) {
            return None;
        }
        let mut keys = vec![target];
        let mut at = target;
        while at != source {
            at = *prev.get(at)?;
            keys.push(at);
        }
        keys.reverse();
        Some(keys)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GraphConfig;
    use crate::connectivity::TransitionStateGraph;
    use crate::model::{Minimum, MinimumId};
    use crate::oracle::EuclideanOracle;
    use crate::proximity::ProximityGraph;
    use crate::storage::MemoryBackend;

    fn m(id: u64, x: f64, y: f64) -> Minimum {
        Minimum::new(MinimumId(id), 0.0, vec![x, y])
    }

    fn ids(route: &crate::model::Route) -> Vec<u64> {
        route.minima.iter().map(|m| m.id.0).collect()
    }

    fn graph_over(minima: &[Minimum]) -> ProximityGraph<MemoryBackend, TransitionStateGraph, EuclideanOracle> {
        let mut g = ProximityGraph::new(
            MemoryBackend::new(),
            TransitionStateGraph::new(),
            EuclideanOracle,
            GraphConfig::default(),
        )
        .unwrap();
        for x in minima {
            g.add_minimum(x).unwrap();
        }
        g
    }

    #[test]
    fn test_prefers_short_hops() {
        // Collinear: 0 -- 1 -- 2, squared weights make the detour cheaper.
        let minima = [m(1, 0.0, 0.0), m(2, 1.0, 0.0), m(3, 2.0, 0.0)];
        let g = graph_over(&minima);
        let route = g.shortest_path(&minima[0], &minima[2]).unwrap();
        assert_eq!(ids(&route), vec![1, 2, 3]);
        assert_eq!(route.weights, vec![1.0, 1.0]);
    }

    #[test]
    fn test_same_vertex() {
        let minima = [m(1, 0.0, 0.0)];
        let g = graph_over(&minima);
        let route = g.shortest_path(&minima[0], &minima[0]).unwrap();
        assert_eq!(ids(&route), vec![1]);
        assert!(route.is_empty());
    }

    #[test]
    fn test_not_a_vertex() {
        let minima = [m(1, 0.0, 0.0)];
        let g = graph_over(&minima);
        assert!(g.shortest_path(&minima[0], &m(9, 1.0, 1.0)).is_none());
    }

    #[test]
    fn test_disconnected_after_blocking() {
        let minima = [m(1, 0.0, 0.0), m(2, 3.0, 4.0)];
        let mut g = graph_over(&minima);
        g.remove_edge(&minima[0], &minima[1]);
        assert!(g.shortest_path(&minima[0], &minima[1]).is_none());
    }

    #[test]
    fn test_zero_weight_edges_are_free() {
        let minima = [m(1, 0.0, 0.0), m(2, 10.0, 0.0), m(3, 20.0, 0.0)];
        let mut g = graph_over(&minima);
        g.set_transition_state_connection(&minima[0], &minima[1]);
        g.set_transition_state_connection(&minima[1], &minima[2]);
        let route = g.shortest_path(&minima[0], &minima[2]).unwrap();
        assert_eq!(route.total_weight(), 0.0);
    }
}
