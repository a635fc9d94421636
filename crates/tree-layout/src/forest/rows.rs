use crate::{Point, Vec2};
use petgraph::graph::NodeIndex;

/// Spread each level as an evenly spaced row across the canvas.
///
/// The canvas height is split evenly between levels and each row's width
/// evenly between its nodes, every node sitting at the centre of its cell.
/// Only the non-empty levels share the height, so no empty band is left
/// below the deepest row.
pub(crate) fn place_rows(
    rows: &[Vec<NodeIndex>],
    canvas: Vec2,
    positions: &mut [Option<Point>],
) {
    if rows.is_empty() {
        return;
    }

    let level_height = canvas.y / rows.len() as f64;

    for (level, row) in rows.iter().enumerate() {
        let element_width = canvas.x / row.len() as f64;
        let y = level_height * level as f64 + level_height / 2.0;

        for (index, node) in row.iter().enumerate() {
            let x = element_width * index as f64 + element_width / 2.0;
            positions[node.index()] = Some(Point::new(x, y));
        }
    }
}
