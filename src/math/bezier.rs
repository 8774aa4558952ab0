use super::curve::ParametricCurve2d;
use super::{Point2d, Vector2d};
use crate::util::Interval;

/// A quadratic bezier curve, parametrised over `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadraticBezier2d {
    points: [Point2d; 3],
}

impl QuadraticBezier2d {
    pub const fn new(points: &[Point2d; 3]) -> Self {
        Self { points: *points }
    }

    /// The start point, control point and end point.
    pub fn points(&self) -> &[Point2d; 3] {
        &self.points
    }
}

impl ParametricCurve2d for QuadraticBezier2d {
    fn sample(&self, t: f64) -> Point2d {
        let [p0, p1, p2] = self.points;
        let a = p0 + (p1 - p0) * t;
        let b = p1 + (p2 - p1) * t;
        a + (b - a) * t
    }

    fn bounds(&self) -> Interval<f64> {
        Interval::new(0.0, 1.0)
    }

    fn sample_dt(&self, t: f64) -> Vector2d {
        let [p0, p1, p2] = self.points;
        ((p1 - p0) * (1.0 - t) + (p2 - p1) * t) * 2.0
    }
}
