pub mod binder;
pub mod builder;

pub use binder::{bind_anchor, BoundAnchor};
pub use builder::build_graph;

use rustc_hash::FxHashMap;

use crate::models::Coordinate;

/// Coordinates are interned at ~7 decimal places (sub-meter), so authored
/// points that agree to survey precision share a node.
const COORD_KEY_SCALE: f64 = 1e7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CoordKey(i64, i64);

impl CoordKey {
    pub(crate) fn of(c: Coordinate) -> Self {
        Self(
            (c.lat * COORD_KEY_SCALE).round() as i64,
            (c.lng * COORD_KEY_SCALE).round() as i64,
        )
    }
}

#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: NodeId,
    pub coord: Coordinate,
    /// Set only while the node belongs to exactly one authored segment.
    /// Cleared when a second distinct segment reuses the coordinate, and
    /// on merged representatives whose members disagree.
    pub origin: Option<String>,
}

/// The merged campus path network: undirected, modeled as paired directed
/// adjacency entries.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    adjacency: Vec<Vec<(NodeId, f64)>>,
    key_index: FxHashMap<CoordKey, NodeId>,
    /// Authored coordinate -> post-merge representative, so the binder can
    /// wire a projection to the endpoints of the interval it fell on.
    source_index: FxHashMap<CoordKey, NodeId>,
}

impl Graph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Undirected edge count.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn coord(&self, id: NodeId) -> Coordinate {
        self.nodes[id.0].coord
    }

    pub fn neighbors(&self, id: NodeId) -> &[(NodeId, f64)] {
        &self.adjacency[id.0]
    }

    /// Find-or-create the node for a coordinate. A reuse from a different
    /// segment clears the origin tag: an exactly-shared coordinate is
    /// already a junction and must not take part in the proximity merge.
    pub(crate) fn intern(&mut self, coord: Coordinate, origin: Option<&str>) -> NodeId {
        let key = CoordKey::of(coord);
        if let Some(&id) = self.key_index.get(&key) {
            let node = &mut self.nodes[id.0];
            if node.origin.as_deref() != origin {
                node.origin = None;
            }
            return id;
        }
        self.push_node(coord, origin.map(str::to_owned))
    }

    pub(crate) fn push_node(&mut self, coord: Coordinate, origin: Option<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(GraphNode { id, coord, origin });
        self.adjacency.push(Vec::new());
        self.key_index.entry(CoordKey::of(coord)).or_insert(id);
        id
    }

    /// Add the paired directed edges for one undirected link. Self-loops
    /// are ignored.
    pub(crate) fn link(&mut self, a: NodeId, b: NodeId, distance_m: f64) {
        if a == b {
            return;
        }
        self.adjacency[a.0].push((b, distance_m));
        self.adjacency[b.0].push((a, distance_m));
    }

    pub(crate) fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.adjacency[a.0].iter().any(|&(n, _)| n == b)
    }

    pub(crate) fn record_source(&mut self, coord: Coordinate, rep: NodeId) {
        self.source_index.insert(CoordKey::of(coord), rep);
    }

    /// The merged node standing in for an authored coordinate.
    pub(crate) fn source_node(&self, coord: Coordinate) -> Option<NodeId> {
        let key = CoordKey::of(coord);
        self.source_index
            .get(&key)
            .or_else(|| self.key_index.get(&key))
            .copied()
    }
}
