use std::path::PathBuf;

use nalgebra::point;

use crate::{quadtree::DEFAULT_NODE_CAPACITY, shapes::Rect, Error, Result};

/// The only stage this build answers: exact-coordinate lookup with quadrant paths.
pub const STAGE: &str = "3";

/// Everything a run needs, gathered from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    pub stage: String,
    pub dataset: PathBuf,
    pub output: PathBuf,
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
    pub node_capacity: usize,
}

impl Config {
    pub fn new(dataset: PathBuf, output: PathBuf, corners: [f64; 4]) -> Self {
        let [min_lon, min_lat, max_lon, max_lat] = corners;
        Self {
            stage: STAGE.to_string(),
            dataset,
            output,
            min_lon,
            min_lat,
            max_lon,
            max_lat,
            node_capacity: DEFAULT_NODE_CAPACITY,
        }
    }

    /// Fail unless the requested stage is the one this build answers
    pub fn check_stage(&self) -> Result<()> {
        if self.stage != STAGE {
            return Err(Error::StageMismatch {
                expected: STAGE,
                found: self.stage.clone(),
            });
        }
        Ok(())
    }

    /// Root boundary spanning the two configured corners
    pub fn root_boundary(&self) -> Result<Rect> {
        let corners = [self.min_lon, self.min_lat, self.max_lon, self.max_lat];
        if corners.iter().any(|c| !c.is_finite()) {
            return Err(Error::InvalidBounds(format!("{corners:?} are not all finite")));
        }
        if self.min_lon > self.max_lon || self.min_lat > self.max_lat {
            return Err(Error::InvalidBounds(format!(
                "({}, {}) is not below and left of ({}, {})",
                self.min_lon, self.min_lat, self.max_lon, self.max_lat
            )));
        }
        Ok(Rect::new(
            point![self.min_lon, self.min_lat],
            point![self.max_lon, self.max_lat],
        ))
    }
}
