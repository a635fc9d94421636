mod boxes;
mod orientation;
mod spanning;

use crate::levels::assign_levels;
use crate::mirror::Mirror;
use crate::strategy::{Plan, Strategy};
use crate::Vec2;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use boxes::BoxTree;
use spanning::minimum_spanning_forest;

pub use orientation::Orientation;

/// Configuration for the hierarchical (box) layout.
///
/// The graph is first reduced to a minimum spanning forest, so cycles and
/// dense regions still give every node a single parent. Siblings are then
/// grouped into boxes hanging off their parent node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hierarchical {
    pub orientation: Orientation,

    /// Extent of every sibling box
    pub box_size: Vec2,
}

impl Default for Hierarchical {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            box_size: Vec2::new(5.0, 1.0),
        }
    }
}

impl Hierarchical {
    /// Create a hierarchical layout with the given orientation
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            ..Default::default()
        }
    }
}

impl Strategy for Hierarchical {
    const NAME: &'static str = "Hierarchical";

    fn plan<N, E>(&self, mirror: &mut Mirror<N, E>, roots: &[NodeIndex]) -> Plan {
        let tree_edges = minimum_spanning_forest(mirror);
        debug!(
            "Spanning forest keeps {tree_edges} of {} edges",
            mirror.edge_count()
        );

        let mirror = &*mirror;
        let levels = assign_levels(mirror.node_count(), roots, |node| {
            mirror
                .incident_edges(node)
                .into_iter()
                .filter(|&edge| mirror.edge(edge).in_tree())
                .map(|edge| mirror.opposite(edge, node))
                .collect()
        });

        let boxes = BoxTree::build(&levels, self.box_size);
        debug!(
            "{} boxes over {} levels",
            boxes.boxes.len(),
            boxes.by_level.len()
        );

        let positions = boxes.render(self.orientation);
        let order = mirror
            .node_indices()
            .map(|node| boxes.order_of(node).unwrap_or(0))
            .collect();

        Plan {
            levels,
            positions,
            order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;
    use test_log::test;

    #[test]
    fn cycles_are_cut_by_weight() {
        let mut m = Mirror::new();
        for node in ["r", "a", "b"] {
            m.add_node(node).unwrap();
        }
        m.add_edge("ra", &"r", &"a", false, 1.0).unwrap();
        m.add_edge("rb", &"r", &"b", false, 9.0).unwrap();
        m.add_edge("ab", &"a", &"b", false, 1.0).unwrap();

        let r = m.index_of(&"r").unwrap();
        let b = m.index_of(&"b").unwrap();
        let plan = Hierarchical::default().plan(&mut m, &[r]);

        // The heavy r-b edge is not part of the tree, so b hangs off a
        assert_eq!(plan.levels.level[b.index()], Some(2));
        assert_eq!(plan.levels.parent[b.index()], m.index_of(&"a"));
    }

    #[test]
    fn star_leaves_spread_across_children_box() {
        let mut m = Mirror::new();
        m.add_node("h").unwrap();
        for leaf in ["l0", "l1", "l2", "l3"] {
            m.add_node(leaf).unwrap();
            m.add_edge(leaf, &"h", &leaf, false, 1.0).unwrap();
        }

        let h = m.index_of(&"h").unwrap();
        let plan = Hierarchical::default().plan(&mut m, &[h]);

        let xs: Vec<f64> = (1..5).map(|i| plan.positions[i].unwrap().x).collect();
        assert_eq!(xs, vec![-2.5, -1.25, 0.0, 1.25]);
        assert!((1..5).all(|i| plan.positions[i].unwrap().y == 1.5));
        assert_eq!(plan.order, vec![0, 0, 1, 2, 3]);
        assert_eq!(plan.positions[0], Some(Point::new(0.0, 0.5)));
    }

    #[test]
    fn config_fills_in_missing_fields() {
        let config: Hierarchical = ron::from_str("(orientation: Disk)").unwrap();
        assert_eq!(config, Hierarchical::new(Orientation::Disk));
        assert_eq!(config.box_size, Vec2::new(5.0, 1.0));
    }
}
