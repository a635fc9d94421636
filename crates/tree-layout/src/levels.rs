use petgraph::graph::NodeIndex;

/// Depth assignment produced by a breadth-first walk from the roots
#[derive(Debug, Clone, PartialEq)]
pub struct Levels {
    /// Depth of each node, `None` when unreachable from the roots
    pub level: Vec<Option<usize>>,

    /// Node through which each node was first reached
    pub parent: Vec<Option<NodeIndex>>,

    /// Nodes of each depth in discovery order
    pub rows: Vec<Vec<NodeIndex>>,
}

impl Levels {
    pub fn depth(&self) -> usize {
        self.rows.len()
    }

    pub fn unreached(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.level
            .iter()
            .enumerate()
            .filter(|(_, level)| level.is_none())
            .map(|(index, _)| NodeIndex::new(index))
    }
}

/// Assign levels round by round, starting with all roots at level 0.
///
/// `neighbours` yields the candidate children of a node. The first visit
/// wins: a node keeps the level and parent it was discovered with, and roots
/// are never re-assigned.
pub(crate) fn assign_levels<F>(node_count: usize, roots: &[NodeIndex], mut neighbours: F) -> Levels
where
    F: FnMut(NodeIndex) -> Vec<NodeIndex>,
{
    let mut levels = Levels {
        level: vec![None; node_count],
        parent: vec![None; node_count],
        rows: Vec::new(),
    };

    let mut frontier = Vec::with_capacity(roots.len());
    for &root in roots {
        if levels.level[root.index()].is_none() {
            levels.level[root.index()] = Some(0);
            frontier.push(root);
        }
    }

    while !frontier.is_empty() {
        let next_level = levels.rows.len() + 1;
        let mut next = Vec::new();

        for &node in &frontier {
            for child in neighbours(node) {
                if levels.level[child.index()].is_none() {
                    levels.level[child.index()] = Some(next_level);
                    levels.parent[child.index()] = Some(node);
                    next.push(child);
                }
            }
        }

        levels.rows.push(frontier);
        frontier = next;
    }

    levels
}
