use serde::{Deserialize, Serialize};

/// 2D vector with f64 coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// Create a new vector
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a zero vector
    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// 2D point with f64 coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset the point by the given vector
    pub fn translate(self, by: Vec2) -> Self {
        Self {
            x: self.x + by.x,
            y: self.y + by.y,
        }
    }
}

/// Axis aligned rectangle spanned by the positions of a layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lo: Point,
    pub hi: Point,
}

impl Bounds {
    /// Degenerate bounds around a single point
    pub fn at(point: Point) -> Self {
        Self {
            lo: point,
            hi: point,
        }
    }

    /// Grow the bounds so that they contain `point`
    pub fn include(&mut self, point: Point) {
        self.lo.x = self.lo.x.min(point.x);
        self.lo.y = self.lo.y.min(point.y);
        self.hi.x = self.hi.x.max(point.x);
        self.hi.y = self.hi.y.max(point.y);
    }

    pub fn width(&self) -> f64 {
        self.hi.x - self.lo.x
    }

    pub fn height(&self) -> f64 {
        self.hi.y - self.lo.y
    }

    pub fn contains(&self, point: Point) -> bool {
        (self.lo.x..=self.hi.x).contains(&point.x) && (self.lo.y..=self.hi.y).contains(&point.y)
    }
}

/// Extend optional bounds with a point, starting them if needed
pub(crate) fn extend(bounds: &mut Option<Bounds>, point: Point) {
    match bounds {
        Some(b) => b.include(point),
        None => *bounds = Some(Bounds::at(point)),
    }
}
