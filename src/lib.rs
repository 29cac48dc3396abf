//! Region quadtree over street-asset coordinates.
//!
//! Records are read from a delimited dataset into a [`RecordStore`] while each
//! record's start and end coordinate is inserted into a [`QuadTree`]. Queries then
//! look a coordinate up in both: the store returns the matching records, and the
//! tree returns the stored points with the quadrant path leading to each.

use nalgebra::Point2;

pub mod config;
mod error;
pub mod lookup;
pub mod quadrant;
pub mod quadtree;
pub mod query;
pub mod record;
pub mod shapes;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use lookup::{locate, Located, COORDINATE_EPSILON};
pub use quadrant::{Quadrant, QuadrantPath};
pub use quadtree::{QuadTree, DEFAULT_NODE_CAPACITY};
pub use query::{Query, QueryResult};
pub use record::{Record, Schema};
pub use shapes::Rect;
pub use store::{IngestStats, RecordStore};

/// 2d point with `f64` coordinates, x = longitude and y = latitude
pub type P2 = Point2<f64>;

/// Trait for getting a 2d point position of data stored in the [`QuadTree`]
pub trait Point {
    /// Get 2d point position
    fn point(&self) -> P2;
}

impl Point for P2 {
    fn point(&self) -> P2 {
        *self
    }
}
