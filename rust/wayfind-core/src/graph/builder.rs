use itertools::Itertools;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::geometry::haversine_distance;
use crate::models::{Coordinate, PathSegment};
use crate::options::RouteOptions;

use super::{Graph, NodeId};

/// Build the merged campus graph from independently authored segments.
///
/// Pass 1 interns one node per unique coordinate and links consecutive
/// pairs with haversine-weighted edges. Pass 2 unions nodes from
/// *different* segments that lie within the merge threshold, collapses
/// each cluster to a centroid representative and rebuilds the edge set
/// over representatives, deduplicating parallel edges. Node and edge
/// counts are deterministic regardless of segment iteration order.
pub fn build_graph(segments: &[PathSegment], options: &RouteOptions) -> Graph {
    let mut raw = Graph::default();

    for seg in segments {
        if seg.nodes.len() < 2 {
            warn!(segment = %seg.id, "segment has fewer than two coordinates, skipped");
            continue;
        }
        let ids: Vec<NodeId> = seg
            .nodes
            .iter()
            .map(|c| raw.intern(*c, Some(&seg.id)))
            .collect();
        for (&a, &b) in ids.iter().tuple_windows() {
            if a != b {
                raw.link(a, b, haversine_distance(raw.coord(a), raw.coord(b)));
            }
        }
    }

    let n = raw.node_count();
    let mut uf = UnionFind::new(n);

    for i in 0..n {
        for j in (i + 1)..n {
            let d = haversine_distance(raw.nodes[i].coord, raw.nodes[j].coord);
            if d > options.merge_threshold_m {
                continue;
            }
            match (&raw.nodes[i].origin, &raw.nodes[j].origin) {
                (Some(a), Some(b)) if a != b => uf.union(i, j),
                (Some(_), Some(_)) => {
                    // Same segment: a sinuous path may revisit a nearby
                    // coordinate without being a junction.
                }
                _ => {
                    warn!(
                        a = i,
                        b = j,
                        "merge candidate without an origin segment, skipped"
                    );
                }
            }
        }
    }

    // Collapse clusters to centroid representatives, assigning new ids in
    // first-appearance order so the output is stable for a given input.
    let mut members: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
    for i in 0..n {
        members.entry(uf.find(i)).or_default().push(i);
    }

    let mut merged = Graph::default();
    let mut rep_of: Vec<NodeId> = vec![NodeId(0); n];
    let mut rep_by_root: FxHashMap<usize, NodeId> = FxHashMap::default();

    for i in 0..n {
        let root = uf.find(i);
        let rep = *rep_by_root.entry(root).or_insert_with(|| {
            let cluster = &members[&root];
            let count = cluster.len() as f64;
            let centroid = Coordinate::new(
                cluster.iter().map(|&m| raw.nodes[m].coord.lat).sum::<f64>() / count,
                cluster.iter().map(|&m| raw.nodes[m].coord.lng).sum::<f64>() / count,
            );
            merged.push_node(centroid, unanimous_origin(&raw, cluster))
        });
        rep_of[i] = rep;
    }

    for i in 0..n {
        merged.record_source(raw.nodes[i].coord, rep_of[i]);
    }

    // Rebuild edges over representatives: one undirected edge per
    // unordered pair, distance recomputed from the merged coordinates.
    let mut seen: FxHashSet<(NodeId, NodeId)> = FxHashSet::default();
    for u in 0..n {
        for &(v, _) in raw.neighbors(NodeId(u)) {
            let (ru, rv) = (rep_of[u], rep_of[v.0]);
            if ru == rv {
                continue;
            }
            let pair = (ru.min(rv), ru.max(rv));
            if seen.insert(pair) {
                merged.link(ru, rv, haversine_distance(merged.coord(ru), merged.coord(rv)));
            }
        }
    }

    debug!(
        raw_nodes = n,
        nodes = merged.node_count(),
        edges = merged.edge_count(),
        "graph built"
    );
    merged
}

fn unanimous_origin(raw: &Graph, cluster: &[usize]) -> Option<String> {
    let mut it = cluster.iter().map(|&m| raw.nodes[m].origin.as_deref());
    let first = it.next()??;
    if it.all(|o| o == Some(first)) {
        Some(first.to_owned())
    } else {
        None
    }
}

/// Union-find with union by size. `find` compresses paths iteratively:
/// deep clusters must not recurse.
struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
    }
}
