mod rows;

use crate::levels::assign_levels;
use crate::mirror::Mirror;
use crate::strategy::{Plan, Strategy};
use crate::Vec2;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use rows::place_rows;

/// Configuration for the forest (row) layout.
///
/// Levels come straight from the edges, walking from each node to the
/// sources of its entering edges, and every level becomes one row of a
/// fixed size canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Forest {
    /// Width and height of the drawing area
    pub canvas: Vec2,
}

impl Default for Forest {
    fn default() -> Self {
        Self {
            canvas: Vec2::new(600.0, 400.0),
        }
    }
}

impl Forest {
    pub fn new(canvas: Vec2) -> Self {
        Self { canvas }
    }
}

impl Strategy for Forest {
    const NAME: &'static str = "Forest";

    fn plan<N, E>(&self, mirror: &mut Mirror<N, E>, roots: &[NodeIndex]) -> Plan {
        let mirror = &*mirror;
        let levels = assign_levels(mirror.node_count(), roots, |node| {
            mirror
                .entering_edges(node)
                .into_iter()
                .map(|edge| mirror.opposite(edge, node))
                .collect()
        });
        debug!("Forest has {} levels", levels.depth());

        let mut positions = vec![None; mirror.node_count()];
        place_rows(&levels.rows, self.canvas, &mut positions);

        let mut order = vec![0; mirror.node_count()];
        for row in &levels.rows {
            for (index, node) in row.iter().enumerate() {
                order[node.index()] = index;
            }
        }

        Plan {
            levels,
            positions,
            order,
        }
    }
}
