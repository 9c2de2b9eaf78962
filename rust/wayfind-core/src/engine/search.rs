use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::graph::{Graph, NodeId};

#[derive(Clone, Copy, Debug)]
struct QueueEntry {
    cost: f64,
    node: NodeId,
    // Monotonic insertion sequence keeps pop order deterministic when
    // costs and node ids tie.
    seq: u64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost.to_bits() == other.cost.to_bits() && self.node == other.node && self.seq == other.seq
    }
}
impl Eq for QueueEntry {}
impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; invert ordering for min-heap behavior.
        // Compare cost asc, then node id asc, then seq asc.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Single-source shortest-path tree from a Dijkstra run.
#[derive(Debug)]
pub struct ShortestPaths {
    start: NodeId,
    dist: Vec<f64>,
    prev: Vec<Option<NodeId>>,
}

impl ShortestPaths {
    pub fn distance(&self, node: NodeId) -> f64 {
        self.dist[node.0]
    }

    pub fn reachable(&self, node: NodeId) -> bool {
        self.dist[node.0].is_finite()
    }

    /// Walk predecessors backward from `node` to the start. `None` when
    /// the node was never reached.
    pub fn path_to(&self, node: NodeId) -> Option<Vec<NodeId>> {
        if !self.reachable(node) {
            return None;
        }
        let mut path = vec![node];
        let mut cur = node;
        while cur != self.start {
            cur = self.prev[cur.0]?;
            path.push(cur);
        }
        path.reverse();
        Some(path)
    }
}

/// Weighted Dijkstra over the augmented graph. With a goal, stops early
/// once the goal pops; without one, explores the whole component.
pub fn dijkstra(graph: &Graph, start: NodeId, goal: Option<NodeId>) -> ShortestPaths {
    let n = graph.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<NodeId>> = vec![None; n];
    let mut open = BinaryHeap::new();
    let mut seq: u64 = 0;

    dist[start.0] = 0.0;
    open.push(QueueEntry { cost: 0.0, node: start, seq });

    while let Some(entry) = open.pop() {
        // Discard stale entries superseded by a better relaxation
        if entry.cost > dist[entry.node.0] {
            continue;
        }
        if goal == Some(entry.node) {
            break;
        }
        for &(next, weight) in graph.neighbors(entry.node) {
            let tentative = entry.cost + weight;
            if tentative < dist[next.0] {
                dist[next.0] = tentative;
                prev[next.0] = Some(entry.node);
                seq = seq.wrapping_add(1);
                open.push(QueueEntry { cost: tentative, node: next, seq });
            }
        }
    }

    ShortestPaths { start, dist, prev }
}
