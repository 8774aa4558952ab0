use super::{PosTheta, RoadCurve};
use crate::math::{
    equidistant_points_along_curve, rot90, ParametricCurve2d, QuadraticBezier2d,
};
use cgmath::prelude::*;

/// The default spacing of the points an arbitrary curve is resampled at, in m.
const SAMPLE_SPACING: f64 = 0.5;

/// An arbitrary parametric curve re-parametrised by arc length,
/// for use as an opaque road mapping.
///
/// The curve is approximated by quadratic pieces through equidistant points,
/// so sampling at a longitudinal position is a constant time lookup.
#[derive(Clone, Debug)]
pub struct SampledCurve {
    scale: f64,
    length: f64,
    segments: Vec<QuadraticBezier2d>,
}

impl SampledCurve {
    /// Creates a [SampledCurve] from the given parametric curve,
    /// with the default step size.
    ///
    /// # Panics
    /// If the curve has zero length.
    pub fn new(curve: &impl ParametricCurve2d) -> Self {
        Self::with_step(curve, SAMPLE_SPACING)
    }

    /// Creates a [SampledCurve] from the given parametric curve,
    /// with the given step size.
    pub fn with_step(curve: &impl ParametricCurve2d, step: f64) -> Self {
        let (mut points, length) = equidistant_points_along_curve(curve, step);
        assert!(points.len() > 1, "cannot sample a curve of zero length");

        // Each quadratic piece spans two gaps, so pad to an odd point count
        if points.len() % 2 == 0 {
            let n = points.len();
            let (before, last) = (points[n - 2], points[n - 1]);
            points.push(last + (last - before));
        }

        let segments = points
            .windows(3)
            .step_by(2)
            .map(|window| {
                let [start, through, end] = [window[0], window[1], window[2]];
                // The control point that makes the piece pass through `through` at t = 0.5
                let control = through + (through - start.midpoint(end));
                QuadraticBezier2d::new(&[start, control, end])
            })
            .collect::<Vec<_>>();

        Self {
            scale: 0.5 / step,
            length,
            segments,
        }
    }

    /// Finds the segment containing `pos` and the parameter within it.
    fn sample_internal(&self, pos: f64) -> (&QuadraticBezier2d, f64) {
        let pos = pos * self.scale;
        let idx = usize::min(pos.max(0.0) as usize, self.segments.len() - 1);
        (&self.segments[idx], pos - idx as f64)
    }
}

impl RoadCurve for SampledCurve {
    fn road_length(&self) -> f64 {
        self.length
    }

    fn map(&self, road_pos: f64, lateral_offset: f64) -> PosTheta {
        let (segment, t) = self.sample_internal(road_pos);
        let dir = segment.sample_dt(t).normalize();
        PosTheta {
            pos: segment.sample(t) + rot90(dir) * lateral_offset,
            dir,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Point2d;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn curve_is_arclength_parameterised() {
        let curve = QuadraticBezier2d::new(&[
            Point2d::new(10.0, 10.0),
            Point2d::new(60.0, 40.0),
            Point2d::new(100.0, 45.0),
        ]);
        let curve = SampledCurve::new(&curve);

        let ts = (0..100)
            .map(|i| i as f64 * 0.01 * curve.road_length())
            .collect::<Vec<_>>();
        for ts in ts.windows(2) {
            let p1 = curve.map(ts[0], 0.0).pos;
            let p2 = curve.map(ts[1], 0.0).pos;
            assert_approx_eq!((p2 - p1).magnitude(), ts[1] - ts[0], 0.01);
        }
    }
}
