//! Candidate selector: which minima are worth activating for a connection.
//!
//! A minimum lying between start and end cannot be farther from either
//! endpoint than the endpoints are from each other. Only distances already
//! in the cache are consulted; a minimum with an unknown distance to either
//! endpoint is skipped. This prunes on incidental knowledge and can both
//! miss and over-include truly relevant minima.

use tracing::info;

use crate::cache::DistanceCache;
use crate::connectivity::ConnectivityGraph;
use crate::model::Minimum;
use crate::oracle::DistanceOracle;

/// Minima from `connectivity` whose cached distances to both `start` and
/// `end` are at most `start_end_distance`.
///
/// Never calls the oracle. The endpoints themselves are not returned.
pub fn select_relevant<C, O>(
    cache: &DistanceCache<O>,
    connectivity: &C,
    start: &Minimum,
    end: &Minimum,
    start_end_distance: f64,
) -> Vec<Minimum>
where
    C: ConnectivityGraph,
    O: DistanceOracle,
{
    let candidates = connectivity.minima();
    let scanned = candidates.len();
    let accepted: Vec<Minimum> = candidates
        .into_iter()
        .filter(|m| m != start && m != end)
        .filter(|m| within(cache.cached(m, start), start_end_distance))
        .filter(|m| within(cache.cached(m, end), start_end_distance))
        .collect();
    info!(accepted = accepted.len(), scanned, "found relevant minima");
    accepted
}

fn within(distance: Option<f64>, bound: f64) -> bool {
    matches!(distance, Some(d) if d <= bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::TransitionStateGraph;
    use crate::model::{MinimumId, PairKey};
    use crate::oracle::EuclideanOracle;

    fn m(id: u64) -> Minimum {
        Minimum::new(MinimumId(id), 0.0, vec![id as f64])
    }

    fn key(a: u64, b: u64) -> PairKey {
        PairKey::new(MinimumId(a), MinimumId(b))
    }

    fn setup() -> (DistanceCache<EuclideanOracle>, TransitionStateGraph) {
        let ts = TransitionStateGraph::new();
        for i in 1..=5 {
            ts.add_minimum(m(i));
        }
        (DistanceCache::new(EuclideanOracle, true, 300), ts)
    }

    #[test]
    fn test_accepts_minimum_between_endpoints() {
        let (mut cache, ts) = setup();
        cache.load(vec![(key(1, 2), 10.0), (key(3, 1), 4.0), (key(3, 2), 6.0)]);

        let picked = select_relevant(&cache, &ts, &m(1), &m(2), 10.0);
        let ids: Vec<MinimumId> = picked.iter().map(|x| x.id).collect();
        assert_eq!(ids, vec![MinimumId(3)]);
    }

    #[test]
    fn test_excludes_far_minimum_with_unknown_second_distance() {
        let (mut cache, ts) = setup();
        cache.load(vec![(key(1, 2), 10.0), (key(4, 1), 12.0)]);
        assert!(select_relevant(&cache, &ts, &m(1), &m(2), 10.0).is_empty());
    }

    #[test]
    fn test_excludes_unknown_distances() {
        let (mut cache, ts) = setup();
        cache.load(vec![(key(1, 2), 10.0), (key(5, 1), 1.0)]);
        assert!(select_relevant(&cache, &ts, &m(1), &m(2), 10.0).is_empty());
    }

    #[test]
    fn test_bound_is_inclusive() {
        let (mut cache, ts) = setup();
        cache.load(vec![(key(1, 2), 10.0), (key(3, 1), 10.0), (key(3, 2), 10.0)]);
        assert_eq!(select_relevant(&cache, &ts, &m(1), &m(2), 10.0).len(), 1);
    }
}
