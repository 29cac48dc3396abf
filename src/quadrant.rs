use std::fmt;

use crate::{shapes::Rect, P2};

/// One of the four quarters a node boundary is split into at its center.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    NW,
    NE,
    SW,
    SE,
}

impl Quadrant {
    /// Order in which children are offered a point during insertion. On a shared
    /// edge the first quadrant in this order that contains the point keeps it.
    pub const INSERT_ORDER: [Quadrant; 4] = [Quadrant::NW, Quadrant::NE, Quadrant::SW, Quadrant::SE];

    /// Order in which children are visited during a region search.
    pub const SEARCH_ORDER: [Quadrant; 4] = [Quadrant::SW, Quadrant::NW, Quadrant::NE, Quadrant::SE];

    /// Position of this quadrant in a node's children array (and in [`Rect::quarter`])
    pub fn index(self) -> usize {
        match self {
            Quadrant::NW => 0,
            Quadrant::NE => 1,
            Quadrant::SW => 2,
            Quadrant::SE => 3,
        }
    }

    /// Two-letter compass label
    pub fn label(self) -> &'static str {
        match self {
            Quadrant::NW => "NW",
            Quadrant::NE => "NE",
            Quadrant::SW => "SW",
            Quadrant::SE => "SE",
        }
    }

    /// Classify a point relative to a center.
    ///
    /// Points on the vertical dividing line belong to the west side, points on the
    /// horizontal dividing line belong to the north side, so the center itself is NW.
    /// This agrees with the first-match insertion order over [`Rect::quarter`].
    pub fn classify(center: &P2, point: &P2) -> Self {
        match (point.x <= center.x, point.y >= center.y) {
            (true, false) => Quadrant::SW,
            (true, true) => Quadrant::NW,
            (false, true) => Quadrant::NE,
            (false, false) => Quadrant::SE,
        }
    }

    /// Classify a point relative to the center of a rect
    pub fn of(rect: &Rect, point: &P2) -> Self {
        Self::classify(&rect.center(), point)
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The quadrant decisions taken from the root down to the leaf holding a point.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuadrantPath(Vec<Quadrant>);

impl QuadrantPath {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, quadrant: Quadrant) {
        self.0.push(quadrant);
    }

    pub fn steps(&self) -> &[Quadrant] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One label per line, root first.
impl fmt::Display for QuadrantPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for q in &self.0 {
            writeln!(f, "{q}")?;
        }
        Ok(())
    }
}

impl FromIterator<Quadrant> for QuadrantPath {
    fn from_iter<I: IntoIterator<Item = Quadrant>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
