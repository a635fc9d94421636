use crate::{Point, Vec2};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Direction in which a hierarchical layout grows.
///
/// Each orientation maps two abstract axes onto the plane: the primary axis
/// along which siblings are spread, and the secondary axis along which
/// depth increases.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Siblings side by side on x, depth grows along y
    #[default]
    Vertical,
    /// Siblings stacked on y, depth grows along x
    Horizontal,
    /// Same placement as `Horizontal`
    Disk,
}

impl Orientation {
    /// Map (primary, secondary) coordinates onto the plane
    fn to_plane(self, primary: f64, secondary: f64) -> (f64, f64) {
        match self {
            Orientation::Vertical => (primary, secondary),
            Orientation::Horizontal | Orientation::Disk => (secondary, primary),
        }
    }

    /// Map plane coordinates onto (primary, secondary)
    fn from_plane(self, x: f64, y: f64) -> (f64, f64) {
        // The mapping is a swap or the identity, so it is its own inverse
        self.to_plane(x, y)
    }

    /// Position of the `index`-th of `len` members inside a box of `size`,
    /// relative to the box origin
    pub fn spread(self, size: Vec2, index: usize, len: usize) -> Point {
        let (primary, secondary) = self.from_plane(size.x, size.y);
        let (x, y) = self.to_plane(primary * index as f64 / len as f64, secondary / 2.0);
        Point::new(x, y)
    }

    /// Offset of a child box so that it hangs off its parent node: centred
    /// on the parent along the primary axis, pushed past half of the parent
    /// box along the secondary axis
    pub fn anchor(self, parent: Point, parent_box: Vec2, size: Vec2) -> Vec2 {
        let (parent_primary, parent_secondary) = self.from_plane(parent.x, parent.y);
        let (extent, _) = self.from_plane(size.x, size.y);
        let (_, parent_extent) = self.from_plane(parent_box.x, parent_box.y);
        let (x, y) = self.to_plane(
            parent_primary - extent / 2.0,
            parent_secondary + parent_extent / 2.0,
        );
        Vec2::new(x, y)
    }

    /// Scale factors for a child box at `level` whose parent shares its box
    /// with `parent_siblings` nodes.
    ///
    /// These are never applied to positions; layouts log them for
    /// diagnostics only.
    pub fn legacy_scale(self, level: usize, parent_siblings: usize) -> Vec2 {
        let (x, y) = self.to_plane(
            1.0 / parent_siblings as f64,
            1.0 / 2f64.powi(level as i32),
        );
        Vec2::new(x, y)
    }
}
