use super::Orientation;
use crate::levels::Levels;
use crate::{Point, Vec2};
use petgraph::graph::NodeIndex;
use tracing::trace;

/// Siblings sharing a parent, and the rectangle they are spread over
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LayoutBox {
    /// `None` only for the root box
    pub parent: Option<NodeIndex>,
    pub level: usize,
    pub members: Vec<NodeIndex>,
    pub size: Vec2,
    /// Rank among the boxes of the same level
    pub order: usize,
}

impl LayoutBox {
    fn new(parent: Option<NodeIndex>, level: usize, size: Vec2) -> Self {
        Self {
            parent,
            level,
            members: Vec::new(),
            size,
            order: 0,
        }
    }
}

/// Box structure of one layout pass, rebuilt from scratch every time
#[derive(Debug, Clone)]
pub(crate) struct BoxTree {
    pub boxes: Vec<LayoutBox>,

    /// Box indices per level, sorted by `order`
    pub by_level: Vec<Vec<usize>>,

    /// Box each node is a member of
    pub member_of: Vec<Option<usize>>,

    /// Position of each node among the members of its box
    pub slot: Vec<usize>,
}

impl BoxTree {
    /// Build the boxes from an already computed level assignment.
    ///
    /// The roots form the root box. Every reached node owns a children box
    /// one level below its own, even when it has no children, and its
    /// children join that box in discovery order.
    pub fn build(levels: &Levels, size: Vec2) -> Self {
        let node_count = levels.level.len();
        let mut root = LayoutBox::new(None, 0, size);
        root.members = levels.rows.first().cloned().unwrap_or_default();

        let mut tree = Self {
            boxes: vec![root],
            by_level: vec![vec![0]],
            member_of: vec![None; node_count],
            slot: vec![0; node_count],
        };
        for (slot, &node) in tree.boxes[0].members.iter().enumerate() {
            tree.member_of[node.index()] = Some(0);
            tree.slot[node.index()] = slot;
        }

        let mut children_of = vec![None; node_count];
        for (index, level) in levels.level.iter().enumerate() {
            let Some(level) = *level else {
                continue;
            };

            let id = tree.boxes.len();
            tree.boxes
                .push(LayoutBox::new(Some(NodeIndex::new(index)), level + 1, size));
            if tree.by_level.len() <= level + 1 {
                tree.by_level.resize_with(level + 2, Vec::new);
            }
            tree.by_level[level + 1].push(id);
            children_of[index] = Some(id);
        }

        for node in levels.rows.iter().skip(1).flatten().copied() {
            let Some(id) = levels.parent[node.index()].and_then(|p| children_of[p.index()]) else {
                continue;
            };
            tree.slot[node.index()] = tree.boxes[id].members.len();
            tree.boxes[id].members.push(node);
            tree.member_of[node.index()] = Some(id);
        }

        tree.sort_levels();
        tree
    }

    /// Order each level's boxes by the order of their parent's box, keeping
    /// discovery order among equals, then renumber them
    fn sort_levels(&mut self) {
        for level in 0..self.by_level.len() {
            let mut ids = std::mem::take(&mut self.by_level[level]);
            if level > 0 {
                ids.sort_by_key(|&id| self.parent_box(id).map_or(0, |p| self.boxes[p].order));
            }
            for (order, &id) in ids.iter().enumerate() {
                self.boxes[id].order = order;
            }
            self.by_level[level] = ids;
        }
    }

    fn parent_box(&self, id: usize) -> Option<usize> {
        self.boxes[id]
            .parent
            .and_then(|parent| self.member_of[parent.index()])
    }

    /// Place every node, level by level, so that parents are always placed
    /// before the boxes hanging off them
    pub fn render(&self, orientation: Orientation) -> Vec<Option<Point>> {
        let mut positions = vec![None; self.member_of.len()];

        for &id in self.by_level.iter().flatten() {
            let b = &self.boxes[id];
            if b.members.is_empty() {
                continue;
            }

            let offset = match (b.parent, self.parent_box(id)) {
                (Some(parent), Some(parent_box)) => {
                    let parent_box = &self.boxes[parent_box];
                    let Some(anchor) = positions[parent.index()] else {
                        continue;
                    };

                    // Computed for diagnostics only, positions are not scaled
                    let scale = orientation.legacy_scale(b.level, parent_box.members.len());
                    trace!(
                        "Box {id} at level {} under {parent:?}, scale {scale:?} not applied",
                        b.level
                    );

                    orientation.anchor(anchor, parent_box.size, b.size)
                }
                _ => Vec2::zero(),
            };

            let len = b.members.len();
            for (index, &node) in b.members.iter().enumerate() {
                let local = orientation.spread(b.size, index, len);
                positions[node.index()] = Some(local.translate(offset));
            }
        }

        positions
    }

    /// Index of `node` within its sibling box
    pub fn order_of(&self, node: NodeIndex) -> Option<usize> {
        self.member_of[node.index()].map(|_| self.slot[node.index()])
    }
}
