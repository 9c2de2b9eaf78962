pub mod search;

pub use search::{dijkstra, ShortestPaths};

use tracing::warn;

use crate::cache::{CacheKey, GraphCache};
use crate::errors::RouteError;
use crate::geometry::haversine_distance;
use crate::graph::{bind_anchor, build_graph, Graph};
use crate::models::{Coordinate, Network, PathSegment};
use crate::options::RouteOptions;

/// The result of one leg computation.
#[derive(Debug, Clone)]
pub enum PathOutcome {
    /// A path traced through the network.
    Network { path: Vec<Coordinate>, distance_m: f64 },
    /// Degraded behavior when the endpoints bound to disconnected
    /// components: the straight line between the two anchors. Callers
    /// must treat this distinctly from a network route.
    StraightLine { path: Vec<Coordinate>, distance_m: f64 },
}

impl PathOutcome {
    pub fn path(&self) -> &[Coordinate] {
        match self {
            PathOutcome::Network { path, .. } | PathOutcome::StraightLine { path, .. } => path,
        }
    }

    pub fn distance_m(&self) -> f64 {
        match self {
            PathOutcome::Network { distance_m, .. }
            | PathOutcome::StraightLine { distance_m, .. } => *distance_m,
        }
    }

    pub fn is_straight_line(&self) -> bool {
        matches!(self, PathOutcome::StraightLine { .. })
    }
}

/// Per-request pathfinding façade. By default every call rebuilds its
/// graph from the segment collection it is handed, so concurrent requests
/// never share graph state; an explicit cache can be attached when the
/// caller owns an invalidation signal (see `GraphCache`).
pub struct PathFinder<'a> {
    options: &'a RouteOptions,
    cache: Option<(&'a GraphCache, i64)>,
}

impl<'a> PathFinder<'a> {
    pub fn new(options: &'a RouteOptions) -> Self {
        Self { options, cache: None }
    }

    /// `version` is the caller's data-version token; a changed token is a
    /// cache miss, which is the invalidation trigger.
    pub fn with_cache(options: &'a RouteOptions, cache: &'a GraphCache, version: i64) -> Self {
        Self { options, cache: Some((cache, version)) }
    }

    pub fn options(&self) -> &RouteOptions {
        self.options
    }

    fn graph_for(&self, network: Network, segments: &[PathSegment]) -> Graph {
        match self.cache {
            Some((cache, version)) => {
                let key = CacheKey { network, version };
                (*cache.get_or_build(key, segments, self.options)).clone()
            }
            None => build_graph(segments, self.options),
        }
    }

    /// Shortest path between two anchor coordinates over one network.
    ///
    /// `NoProjection` when nothing can be bound at all; the straight-line
    /// fallback when binding succeeds but the end stays unreachable.
    pub fn find(
        &self,
        start: Coordinate,
        end: Coordinate,
        network: Network,
        segments: &[PathSegment],
    ) -> Result<PathOutcome, RouteError> {
        let mut graph = self.graph_for(network, segments);
        let from = bind_anchor(&mut graph, segments, start)?;
        let to = bind_anchor(&mut graph, segments, end)?;

        let sp = dijkstra(&graph, from.node, Some(to.node));
        match sp.path_to(to.node) {
            Some(ids) => Ok(PathOutcome::Network {
                path: ids.iter().map(|&id| graph.coord(id)).collect(),
                distance_m: sp.distance(to.node),
            }),
            None => {
                warn!(
                    network = network.as_str(),
                    "no connectivity between bound anchors, degrading to straight line"
                );
                Ok(PathOutcome::StraightLine {
                    path: vec![start, end],
                    distance_m: haversine_distance(start, end),
                })
            }
        }
    }

    /// Full exploration from `start`; returns the reachable node closest
    /// to `target` and the path to it. Backs the accessible-mode
    /// substitution fallback.
    pub fn nearest_reachable(
        &self,
        start: Coordinate,
        target: Coordinate,
        network: Network,
        segments: &[PathSegment],
    ) -> Result<(Coordinate, PathOutcome), RouteError> {
        let mut graph = self.graph_for(network, segments);
        let from = bind_anchor(&mut graph, segments, start)?;

        let sp = dijkstra(&graph, from.node, None);
        let best = graph
            .nodes()
            .iter()
            .filter(|n| sp.reachable(n.id))
            .min_by(|a, b| {
                haversine_distance(a.coord, target)
                    .total_cmp(&haversine_distance(b.coord, target))
                    .then_with(|| a.id.cmp(&b.id))
            })
            .map(|n| n.id)
            // The start node is always reachable from itself
            .unwrap_or(from.node);

        let path: Vec<Coordinate> = sp
            .path_to(best)
            .unwrap_or_else(|| vec![best])
            .iter()
            .map(|&id| graph.coord(id))
            .collect();
        let reached = graph.coord(best);
        Ok((
            reached,
            PathOutcome::Network { path, distance_m: sp.distance(best) },
        ))
    }
}

/// Convenience wrapper for the common uncached single-leg call.
pub fn find_shortest_path(
    start: Coordinate,
    end: Coordinate,
    network: Network,
    segments: &[PathSegment],
    options: &RouteOptions,
) -> Result<PathOutcome, RouteError> {
    PathFinder::new(options).find(start, end, network, segments)
}
