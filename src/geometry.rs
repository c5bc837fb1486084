//! Dead-reckoning path geometry.
//!
//! Points live in a local metric frame anchored at the session origin
//! `(0, 0)`. A [`Path`] is the ordered list of positions visited, one per
//! recorded step, and is turned into a polygon by [`Path::close_loop`] before
//! its area is taken with the shoelace formula.

use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Move `stride` meters along `heading_radians` (0 = +x, counter-clockwise positive)
    pub fn advance(&self, stride: f64, heading_radians: f64) -> Point {
        let step = Rotation2::new(heading_radians) * Vector2::new(stride, 0.0);
        Point::new(self.x + step.x, self.y + step.y)
    }
}

/// Ordered positions of a walk, always starting at the origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    points: Vec<Point>,
}

impl Path {
    pub fn new() -> Self {
        Self {
            points: vec![Point::ORIGIN],
        }
    }

    /// Clear the path and reseed it with the origin
    pub fn reset(&mut self) {
        self.points.clear();
        self.points.push(Point::ORIGIN);
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    /// The last `n` points (fewer if the path is shorter)
    pub fn tail(&self, n: usize) -> &[Point] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }

    /// Append a copy of the first point when the walk did not end near it.
    ///
    /// Only paths with more than two points are considered. The loop is closed
    /// when the first-to-last distance exceeds `tolerance`; walks that already
    /// returned to the start are left alone. Returns whether a point was added.
    pub fn close_loop(&mut self, tolerance: f64) -> bool {
        if self.points.len() <= 2 {
            return false;
        }
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        if first.distance_to(&last) > tolerance {
            self.points.push(first);
            true
        } else {
            false
        }
    }

    /// Absolute shoelace area of the path, assumed already closed
    pub fn area(&self) -> f64 {
        shoelace_area(&self.points)
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::new()
    }
}

/// Signed shoelace sum over consecutive pairs.
///
/// Expects `points[n-1] == points[0]`; an open list is summed as-is, which
/// drops the closing edge. Counter-clockwise polygons come out positive.
pub fn signed_shoelace_area(points: &[Point]) -> f64 {
    let sum: f64 = points
        .windows(2)
        .map(|pair| pair[0].x * pair[1].y - pair[1].x * pair[0].y)
        .sum();
    0.5 * sum
}

pub fn shoelace_area(points: &[Point]) -> f64 {
    signed_shoelace_area(points).abs()
}
