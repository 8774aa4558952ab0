use super::{PosTheta, RoadCurve};
use crate::math::{unit_vector, Point2d, Vector2d};
use std::f64::consts::TAU;

/// A closed circular road.
///
/// The road starts at angle zero and runs with decreasing angle,
/// so positive lateral offsets point away from the centre.
#[derive(Clone, Copy, Debug)]
pub struct CircleMapping {
    centre: Point2d,
    radius: f64,
}

impl CircleMapping {
    pub fn new(centre: Point2d, radius: f64) -> Self {
        Self { centre, radius }
    }

    pub fn centre(&self) -> Point2d {
        self.centre
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl RoadCurve for CircleMapping {
    fn road_length(&self) -> f64 {
        TAU * self.radius
    }

    fn map(&self, road_pos: f64, lateral_offset: f64) -> PosTheta {
        let phi = -road_pos / self.radius;
        PosTheta {
            pos: self.centre + unit_vector(phi) * (self.radius + lateral_offset),
            dir: Vector2d::new(phi.sin(), -phi.cos()),
        }
    }
}
