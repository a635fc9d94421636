use crate::mirror::Mirror;
use petgraph::graph::{EdgeIndex, NodeIndex};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use tracing::trace;

/// Heap entry ordered by weight, then by edge index
#[derive(Debug, Clone, Copy)]
struct Candidate {
    weight: f64,
    edge: EdgeIndex,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then_with(|| self.edge.cmp(&other.edge))
    }
}

/// Reduce the mirror to a minimum spanning forest using Prim's algorithm.
///
/// Every edge gets its `in_tree` flag rewritten. Each connected component is
/// grown from its lowest indexed node. Returns the number of tree edges.
pub(crate) fn minimum_spanning_forest<N, E>(mirror: &mut Mirror<N, E>) -> usize {
    let edges: Vec<EdgeIndex> = mirror.edge_indices().collect();
    for edge in edges {
        mirror.edge_mut(edge).in_tree = false;
    }

    let mut visited = vec![false; mirror.node_count()];
    let mut heap = BinaryHeap::new();
    let mut tree_edges = 0;

    let starts: Vec<NodeIndex> = mirror.node_indices().collect();
    for start in starts {
        if visited[start.index()] {
            continue;
        }

        visited[start.index()] = true;
        push_frontier(mirror, start, &visited, &mut heap);

        while let Some(Reverse(Candidate { edge, .. })) = heap.pop() {
            let (source, target) = mirror.endpoints(edge);
            let next = match (visited[source.index()], visited[target.index()]) {
                (true, false) => target,
                (false, true) => source,
                _ => continue,
            };

            mirror.edge_mut(edge).in_tree = true;
            tree_edges += 1;
            visited[next.index()] = true;
            push_frontier(mirror, next, &visited, &mut heap);
        }

        trace!("Spanning tree grown from {start:?}, {tree_edges} tree edges so far");
    }

    tree_edges
}

fn push_frontier<N, E>(
    mirror: &Mirror<N, E>,
    node: NodeIndex,
    visited: &[bool],
    heap: &mut BinaryHeap<Reverse<Candidate>>,
) {
    for edge in mirror.incident_edges(node) {
        if !visited[mirror.opposite(edge, node).index()] {
            heap.push(Reverse(Candidate {
                weight: mirror.edge(edge).weight(),
                edge,
            }));
        }
    }
}
