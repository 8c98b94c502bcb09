//! Vector arithmetic and axis-aligned rectangles in board-local pixels.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A board-local position or a pixel extent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        vec_add(self, rhs)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        vec_sub(self, rhs)
    }
}

/// Pointwise sum of two vectors.
#[must_use]
pub fn vec_add(a: Point, b: Point) -> Point {
    Point { x: a.x + b.x, y: a.y + b.y }
}

/// Pointwise difference `a - b`.
#[must_use]
pub fn vec_sub(a: Point, b: Point) -> Point {
    Point { x: a.x - b.x, y: a.y - b.y }
}

/// Axis-aligned rectangle: top-left `position` plus `dimension` (width, height).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub position: Point,
    pub dimension: Point,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { position: Point::new(x, y), dimension: Point::new(width, height) }
    }

    /// Right edge (`x + width`).
    #[must_use]
    pub fn right(&self) -> f64 {
        self.position.x + self.dimension.x
    }

    /// Bottom edge (`y + height`).
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.position.y + self.dimension.y
    }

    /// Whether `pt` lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.position.x && pt.x <= self.right() && pt.y >= self.position.y && pt.y <= self.bottom()
    }

    /// Whether the two rectangles overlap on both axes. Touching edges do not count.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.position.x < other.right()
            && self.right() > other.position.x
            && self.position.y < other.bottom()
            && self.bottom() > other.position.y
    }
}

/// Bounding box of two arbitrary diagonal points.
///
/// Position is the componentwise minimum, dimension the componentwise
/// `max - min`, so the result never has a negative extent.
#[must_use]
pub fn bounding_box(a: Point, b: Point) -> Rect {
    let position = Point { x: a.x.min(b.x), y: a.y.min(b.y) };
    let dimension = Point { x: a.x.max(b.x) - position.x, y: a.y.max(b.y) - position.y };
    Rect { position, dimension }
}
