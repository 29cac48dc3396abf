use nalgebra as na;

use crate::P2;

/// Represents an axis-aligned, boundary-inclusive rectangle. It is used both as the
/// boundary of every QuadTree node and as the query window of a region search.
///
/// The start (min) corner, end (max) corner and center are all stored so that the
/// quarters of a rect share the parent's exact edge coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    start: P2,
    center: P2,
    end: P2,
}

impl Rect {
    /// Create a new rect from its min (start) and max (end) corners
    pub fn new(start: P2, end: P2) -> Self {
        Self {
            start,
            center: na::center(&start, &end),
            end,
        }
    }

    /// Create a rect from a center point and half-extents on each axis.
    ///
    /// **Returns** `None` if either extent is negative or not finite.
    pub fn from_center(center: P2, x_half: f64, y_half: f64) -> Option<Self> {
        if !(x_half.is_finite() && y_half.is_finite()) || x_half < 0.0 || y_half < 0.0 {
            return None;
        }
        let half = na::vector![x_half, y_half];
        Some(Self {
            start: center - half,
            center,
            end: center + half,
        })
    }

    /// Get the min corner of the rect
    pub fn start(&self) -> P2 {
        self.start
    }

    /// Get the max corner of the rect
    pub fn end(&self) -> P2 {
        self.end
    }

    /// Get the center point of the rect
    pub fn center(&self) -> P2 {
        self.center
    }

    /// Half of the rect's width
    pub fn x_half(&self) -> f64 {
        (self.end.x - self.start.x) / 2.0
    }

    /// Half of the rect's height
    pub fn y_half(&self) -> f64 {
        (self.end.y - self.start.y) / 2.0
    }

    /// Check if a point lies within the rect, edges included
    pub fn contains(&self, point: &P2) -> bool {
        point.x >= self.start.x
            && point.x <= self.end.x
            && point.y >= self.start.y
            && point.y <= self.end.y
    }

    /// Check if the rect shares any space with another rect. Rects that only touch
    /// along an edge or at a corner count as intersecting.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.end.x < other.start.x
            || self.start.x > other.end.x
            || self.end.y < other.start.y
            || self.start.y > other.end.y)
    }

    /// Quarter the rect to produce four smaller rects, ordered NW, NE, SW, SE
    pub fn quarter(&self) -> [Self; 4] {
        let &Rect { start, center, end } = self;

        [
            Rect::new(na::point![start.x, center.y], na::point![center.x, end.y]),
            Rect::new(center, end),
            Rect::new(start, center),
            Rect::new(na::point![center.x, start.y], na::point![end.x, center.y]),
        ]
    }
}
