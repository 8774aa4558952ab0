use super::{PosTheta, RoadCurve};
use crate::math::{rot90, unit_vector, Point2d, Vector2d};
use std::f64::consts::{FRAC_PI_2, PI};

/// An axis-aligned U-turn: a straight heading in the negative x direction,
/// a 180° bend, and a straight back in the positive x direction.
///
/// The bend is centred `radius` below the end of the first straight (in +y).
/// Positive lateral offsets point away from the centre of the bend.
#[derive(Clone, Copy, Debug)]
pub struct UTurnMapping {
    start: Point2d,
    road_length: f64,
    straight_length: f64,
    radius: f64,
}

impl UTurnMapping {
    /// Creates a U-turn.
    ///
    /// # Parameters
    /// * `start` - The start of the first straight
    /// * `road_length` - The total length of the road
    /// * `straight_length` - The length of each straight
    /// * `radius` - The radius of the bend
    pub fn new(start: Point2d, road_length: f64, straight_length: f64, radius: f64) -> Self {
        Self {
            start,
            road_length,
            straight_length,
            radius,
        }
    }

    /// The length of each straight, in m.
    pub fn straight_length(&self) -> f64 {
        self.straight_length
    }

    /// The radius of the bend, in m.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn bend_length(&self) -> f64 {
        f64::max(self.road_length - 2.0 * self.straight_length, f64::EPSILON)
    }

    fn bend_centre(&self) -> Point2d {
        self.start + Vector2d::new(-self.straight_length, self.radius)
    }
}

impl RoadCurve for UTurnMapping {
    fn road_length(&self) -> f64 {
        self.road_length
    }

    fn map(&self, road_pos: f64, lateral_offset: f64) -> PosTheta {
        let bend_end = self.road_length - self.straight_length;
        if road_pos <= self.straight_length {
            let dir = -Vector2d::unit_x();
            PosTheta {
                pos: self.start + dir * road_pos + rot90(dir) * lateral_offset,
                dir,
            }
        } else if road_pos < bend_end {
            let u = (road_pos - self.straight_length) / self.bend_length();
            let phi = 1.5 * PI - PI * u;
            let radial = unit_vector(phi);
            PosTheta {
                pos: self.bend_centre() + radial * (self.radius + lateral_offset),
                dir: unit_vector(phi - FRAC_PI_2),
            }
        } else {
            let dir = Vector2d::unit_x();
            let origin = self.start + Vector2d::new(-self.straight_length, 2.0 * self.radius);
            PosTheta {
                pos: origin + dir * (road_pos - bend_end) + rot90(dir) * lateral_offset,
                dir,
            }
        }
    }
}
