use super::{Point2d, Vector2d};
use crate::util::Interval;
use cgmath::prelude::*;

/// The most bisection steps spent placing a single resampled point.
const MAX_CHORD_ITERATIONS: usize = 100;

/// Relative tolerance on the chord length between resampled points.
const CHORD_TOLERANCE: f64 = 0.01;

/// A parametric curve in 2D space.
pub trait ParametricCurve2d {
    /// Samples the parametric curve.
    fn sample(&self, t: f64) -> Point2d;

    /// Returns the minimum and maximum t-values that define the bounds of the curve.
    fn bounds(&self) -> Interval<f64>;

    /// Samples the derivative of the parametric curve.
    ///
    /// The default implementation takes a finite difference over a small step.
    fn sample_dt(&self, t: f64) -> Vector2d {
        let delta = self.bounds().length() * 0.0001;
        (self.sample(t + delta) - self.sample(t)) / delta
    }
}

impl<T: ParametricCurve2d + ?Sized> ParametricCurve2d for &T {
    fn sample(&self, t: f64) -> Point2d {
        (**self).sample(t)
    }

    fn bounds(&self) -> Interval<f64> {
        (**self).bounds()
    }

    fn sample_dt(&self, t: f64) -> Vector2d {
        (**self).sample_dt(t)
    }
}

/// Finds points spaced `spacing` apart along a curve, measured as chords.
///
/// Returns the points and the approximate arc length of the curve.
/// The last point is extended past the end of the curve so that every gap is `spacing`.
pub fn equidistant_points_along_curve(
    curve: &impl ParametricCurve2d,
    spacing: f64,
) -> (Vec<Point2d>, f64) {
    let bounds = curve.bounds();
    let end = curve.sample(bounds.max);
    let mut t = bounds.min;
    let mut last = curve.sample(t);
    let mut points = vec![last];

    while (end - last).magnitude() > spacing {
        t = chord_parameter(curve, Interval::new(t, bounds.max), last, spacing);
        last = curve.sample(t);
        points.push(last);
    }

    let remainder = end - last;
    let mut length = (points.len() - 1) as f64 * spacing;
    if remainder.magnitude() > 0.001 * spacing {
        length += remainder.magnitude();
        points.push(last + remainder.normalize_to(spacing));
    }
    (points, length)
}

/// Bisects `range` for the parameter whose point lies `spacing` from `from`.
///
/// The point at `range.max` must be further than `spacing` from `from`.
fn chord_parameter(
    curve: &impl ParametricCurve2d,
    mut range: Interval<f64>,
    from: Point2d,
    spacing: f64,
) -> f64 {
    let mut dists = Interval::new(0.0, (curve.sample(range.max) - from).magnitude());
    let mut t = range.max;
    for _ in 0..MAX_CHORD_ITERATIONS {
        t = range.lerp(dists.inv_lerp(spacing));
        let dist = (curve.sample(t) - from).magnitude();
        if dist < (1.0 - CHORD_TOLERANCE) * spacing {
            range.min = t;
            dists.min = dist;
        } else if dist > (1.0 + CHORD_TOLERANCE) * spacing {
            range.max = t;
            dists.max = dist;
        } else {
            break;
        }
    }
    t
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    /// A quarter circle of radius 10 about the origin.
    struct QuarterCircle;

    impl ParametricCurve2d for QuarterCircle {
        fn sample(&self, t: f64) -> Point2d {
            Point2d::new(10.0 * t.cos(), 10.0 * t.sin())
        }

        fn bounds(&self) -> Interval<f64> {
            Interval::new(0.0, std::f64::consts::FRAC_PI_2)
        }
    }

    #[test]
    fn points_are_evenly_spaced() {
        let (points, length) = equidistant_points_along_curve(&QuarterCircle, 1.0);
        for pair in points.windows(2) {
            assert_approx_eq!((pair[1] - pair[0]).magnitude(), 1.0, 0.011);
        }
        // Chords slightly undershoot the arc
        assert_approx_eq!(length, 5.0 * std::f64::consts::PI, 0.2);
        assert_eq!(points.len(), 17);
    }

    #[test]
    fn numeric_derivative() {
        let dir = QuarterCircle.sample_dt(0.0);
        assert_approx_eq!(dir.x, 0.0, 0.01);
        assert_approx_eq!(dir.y, 10.0, 0.01);
    }
}
