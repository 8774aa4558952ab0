use super::{PosTheta, RoadCurve};
use crate::math::{rot90, unit_vector, Point2d};
use std::f64::consts::FRAC_PI_2;

/// A road following a circular arc.
///
/// Lateral offsets are measured away from the centre, whichever way the arc turns.
#[derive(Clone, Copy, Debug)]
pub struct ArcMapping {
    centre: Point2d,
    radius: f64,
    start_angle: f64,
    arc_angle: f64,
    clockwise: bool,
}

impl ArcMapping {
    /// Creates an arc.
    ///
    /// # Parameters
    /// * `centre` - The centre of the circle the arc lies on
    /// * `radius` - The radius in m
    /// * `start_angle` - The start angle in radians
    /// * `arc_angle` - The angle subtended by the arc, in radians
    /// * `clockwise` - The turning direction
    pub fn new(
        centre: Point2d,
        radius: f64,
        start_angle: f64,
        arc_angle: f64,
        clockwise: bool,
    ) -> Self {
        Self {
            centre,
            radius,
            start_angle,
            arc_angle,
            clockwise,
        }
    }

    /// Creates an arc whose centre line begins at `start`.
    pub fn from_start(
        start: Point2d,
        radius: f64,
        start_angle: f64,
        arc_angle: f64,
        clockwise: bool,
    ) -> Self {
        let mut arc = Self::new(start, radius, start_angle, arc_angle, clockwise);
        arc.centre = start - unit_vector(arc.initial_phi()) * radius;
        arc
    }

    pub fn centre(&self) -> Point2d {
        self.centre
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// The start angle in radians.
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    /// The angle subtended by the arc, in radians.
    pub fn arc_angle(&self) -> f64 {
        self.arc_angle
    }

    pub fn clockwise(&self) -> bool {
        self.clockwise
    }

    /// The angle of the start point as seen from the centre.
    fn initial_phi(&self) -> f64 {
        if self.clockwise {
            -self.start_angle - FRAC_PI_2
        } else {
            self.start_angle + FRAC_PI_2
        }
    }

    fn turn_sign(&self) -> f64 {
        if self.clockwise {
            -1.0
        } else {
            1.0
        }
    }
}

impl RoadCurve for ArcMapping {
    fn road_length(&self) -> f64 {
        self.radius * self.arc_angle
    }

    fn map(&self, road_pos: f64, lateral_offset: f64) -> PosTheta {
        let phi = self.initial_phi() + self.turn_sign() * road_pos / self.radius;
        let radial = unit_vector(phi);
        PosTheta {
            pos: self.centre + radial * (self.radius + lateral_offset),
            dir: rot90(radial) * self.turn_sign(),
        }
    }
}
