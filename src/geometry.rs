//! Screen-space geometry shared by the gesture recognizers.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

/// A 2-D coordinate in screen space (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both components are exactly zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
///
/// Extents are never negative when built through [`Rect::from_corners`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// The marquee spanned by a drag's `start` and `current` corners.
    ///
    /// The origin moves to `current` on every axis where the shift is
    /// negative, so the rectangle covers exactly the two corners.
    #[must_use]
    pub fn from_corners(start: Point, current: Point) -> Self {
        let shift = current - start;
        match (shift.x >= 0.0, shift.y >= 0.0) {
            (true, true) => Self::new(start.x, start.y, shift.x, shift.y),
            (true, false) => Self::new(start.x, start.y + shift.y, shift.x, -shift.y),
            (false, true) => Self::new(start.x + shift.x, start.y, -shift.x, shift.y),
            (false, false) => Self::new(start.x + shift.x, start.y + shift.y, -shift.x, -shift.y),
        }
    }

    /// Whether `point` lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x <= self.x + self.width
            && point.y <= self.y + self.height
    }
}
