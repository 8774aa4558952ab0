use super::{PosTheta, RoadCurve};
use crate::math::{rot90, unit_vector, Point2d, Vector2d};
use cgmath::prelude::*;

/// A straight road.
#[derive(Clone, Copy, Debug)]
pub struct LineMapping {
    start: Point2d,
    dir: Vector2d,
    length: f64,
}

impl LineMapping {
    /// Creates a straight road starting at `start`, heading at `heading` radians.
    pub fn new(start: Point2d, heading: f64, length: f64) -> Self {
        Self {
            start,
            dir: unit_vector(heading),
            length,
        }
    }

    /// Creates a straight road between two points.
    pub fn from_ends(start: Point2d, end: Point2d) -> Self {
        let delta = end - start;
        let length = delta.magnitude();
        let dir = if length > 0.0 {
            delta / length
        } else {
            Vector2d::unit_x()
        };
        Self { start, dir, length }
    }
}

impl RoadCurve for LineMapping {
    fn road_length(&self) -> f64 {
        self.length
    }

    fn map(&self, road_pos: f64, lateral_offset: f64) -> PosTheta {
        PosTheta {
            pos: self.start + self.dir * road_pos + rot90(self.dir) * lateral_offset,
            dir: self.dir,
        }
    }
}
