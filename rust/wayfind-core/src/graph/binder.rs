use itertools::Itertools;
use tracing::debug;

use crate::errors::RouteError;
use crate::geometry::{haversine_distance, project_onto_segment, Projection};
use crate::models::{Coordinate, PathSegment};

use super::{Graph, NodeId};

/// An arbitrary coordinate spliced into the graph: its own synthetic node,
/// plus the projection node on the segment interval it fell closest to.
#[derive(Debug, Clone, Copy)]
pub struct BoundAnchor {
    pub node: NodeId,
    pub projection: NodeId,
    /// Haversine distance from the anchor to its projection.
    pub offset_m: f64,
}

/// Bind `anchor` into the graph: brute-force the closest orthogonal
/// projection across every segment's consecutive-pair windows, splice the
/// projection in as a node wired to the window's two endpoints, and link
/// the anchor's own node to it (covers places that sit off the network).
///
/// Fails with `NoProjection` when the collection is empty or every
/// segment is malformed.
pub fn bind_anchor(
    graph: &mut Graph,
    segments: &[PathSegment],
    anchor: Coordinate,
) -> Result<BoundAnchor, RouteError> {
    let mut best: Option<(Projection, Coordinate, Coordinate)> = None;

    for seg in segments {
        for (&a, &b) in seg.nodes.iter().tuple_windows() {
            let proj = project_onto_segment(anchor, a, b);
            if best
                .as_ref()
                .map_or(true, |(cur, _, _)| proj.distance_m < cur.distance_m)
            {
                best = Some((proj, a, b));
            }
        }
    }

    let Some((proj, a, b)) = best else {
        return Err(RouteError::NoProjection { lat: anchor.lat, lng: anchor.lng });
    };

    // Reuses an existing node when the projection lands near-identical to one.
    let proj_id = graph.intern(proj.coord, None);
    for endpoint in [a, b] {
        if let Some(end_id) = graph.source_node(endpoint) {
            let d = haversine_distance(proj.coord, graph.coord(end_id));
            if end_id != proj_id && d > 0.0 && !graph.has_edge(proj_id, end_id) {
                graph.link(proj_id, end_id, d);
            }
        }
    }

    let anchor_id = graph.intern(anchor, None);
    if anchor_id != proj_id && !graph.has_edge(anchor_id, proj_id) {
        graph.link(anchor_id, proj_id, proj.distance_m);
    }

    debug!(
        anchor_lat = anchor.lat,
        anchor_lng = anchor.lng,
        offset_m = proj.distance_m,
        "anchor bound to graph"
    );

    Ok(BoundAnchor { node: anchor_id, projection: proj_id, offset_m: proj.distance_m })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::models::Network;
    use crate::options::RouteOptions;

    fn seg(id: &str, points: &[(f64, f64)]) -> PathSegment {
        PathSegment {
            id: id.into(),
            network: Network::Walking,
            nodes: points.iter().map(|&(lat, lng)| Coordinate::new(lat, lng)).collect(),
        }
    }

    #[test]
    fn empty_collection_yields_no_projection() {
        let mut g = Graph::default();
        let err = bind_anchor(&mut g, &[], Coordinate::new(1.0, 2.0)).unwrap_err();
        assert!(matches!(err, RouteError::NoProjection { .. }));
    }

    #[test]
    fn off_network_anchor_gets_spliced() {
        let segments = vec![seg("s", &[(0.0, 0.0), (0.0, 0.002)])];
        let mut g = build_graph(&segments, &RouteOptions::default());
        assert_eq!(g.node_count(), 2);

        // ~11 m north of the segment midpoint
        let bound = bind_anchor(&mut g, &segments, Coordinate::new(0.0001, 0.001)).unwrap();
        assert_ne!(bound.node, bound.projection);
        assert!((bound.offset_m - 11.1).abs() < 0.5, "offset {}", bound.offset_m);
        // Projection node plus anchor node
        assert_eq!(g.node_count(), 4);
        // Anchor connects only to its projection
        assert_eq!(g.neighbors(bound.node).len(), 1);
        // Projection is wired to both window endpoints and the anchor
        assert_eq!(g.neighbors(bound.projection).len(), 3);
    }

    #[test]
    fn anchor_on_an_existing_node_is_reused() {
        let segments = vec![seg("s", &[(0.0, 0.0), (0.0, 0.002)])];
        let mut g = build_graph(&segments, &RouteOptions::default());
        let bound = bind_anchor(&mut g, &segments, Coordinate::new(0.0, 0.0)).unwrap();
        assert_eq!(bound.node, bound.projection);
        assert_eq!(g.node_count(), 2);
    }
}
