//! Core geometry types shared by display and natural image space.

use serde::{Deserialize, Serialize};

/// A 2D point. Which space it lives in is decided by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset this point by `(dx, dy)`.
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// An axis-aligned rectangle given by its top-left corner and extent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner X coordinate
    pub x: f32,
    /// Top-left corner Y coordinate
    pub y: f32,
    /// Width of the rectangle
    pub width: f32,
    /// Height of the rectangle
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a normalized rectangle spanning two corner points, in any order.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let x = p1.x.min(p2.x);
        let y = p1.y.min(p2.y);
        let width = (p1.x - p2.x).abs();
        let height = (p1.y - p2.y).abs();
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the top-left corner.
    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Get the bottom-right corner.
    pub fn bottom_right(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    /// Get the area of the rectangle.
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// True when both extents reach `min` (inclusive) and every field is finite.
    pub fn meets_min_size(&self, min: f32) -> bool {
        let finite = [self.x, self.y, self.width, self.height].iter().all(|v| v.is_finite());
        finite && self.width >= min && self.height >= min
    }
}
