use super::{LineMapping, PosTheta, RoadCurve};
use crate::math::{intersect_lines, rot90, ParametricCurve2d, Point2d, QuadraticBezier2d, Vector2d};
use cgmath::prelude::*;
use itertools::Itertools;

/// The number of straight pieces used to measure the length of a bezier.
const BEZIER_LENGTH_SAMPLES: usize = 32;

/// Finds the element of a sequence containing `road_pos`, and the position within it.
/// Positions beyond the end are attributed to the last element.
fn locate<'a, T: RoadCurve>(items: &'a [T], road_pos: f64) -> Option<(&'a T, f64)> {
    let (last, init) = items.split_last()?;
    let mut pos = road_pos;
    for item in init {
        let length = item.road_length();
        if pos <= length {
            return Some((item, pos));
        }
        pos -= length;
    }
    Some((last, pos))
}

/// The position used when mapping into an empty sequence.
fn empty_pos() -> PosTheta {
    PosTheta {
        pos: Point2d::origin(),
        dir: Vector2d::unit_x(),
    }
}

/// A road made of consecutive straight pieces.
#[derive(Clone, Debug, Default)]
pub struct PolyLineMapping {
    lines: Vec<LineMapping>,
    length: f64,
}

impl PolyLineMapping {
    pub fn new(lines: Vec<LineMapping>) -> Self {
        let length = lines.iter().map(RoadCurve::road_length).sum();
        Self { lines, length }
    }

    /// Creates a poly-line passing through each of the points in turn.
    pub fn from_points(points: &[Point2d]) -> Self {
        let lines = points
            .iter()
            .tuple_windows()
            .map(|(a, b)| LineMapping::from_ends(*a, *b))
            .collect();
        Self::new(lines)
    }

    /// The straight pieces, in order.
    pub fn lines(&self) -> &[LineMapping] {
        &self.lines
    }
}

impl RoadCurve for PolyLineMapping {
    fn road_length(&self) -> f64 {
        self.length
    }

    fn map(&self, road_pos: f64, lateral_offset: f64) -> PosTheta {
        match locate(&self.lines, road_pos) {
            Some((line, pos)) => line.map(pos, lateral_offset),
            None => empty_pos(),
        }
    }
}

/// A road following a single quadratic bezier curve.
#[derive(Clone, Debug)]
pub struct BezierMapping {
    curve: QuadraticBezier2d,
    /// Cumulative arc length at evenly spaced values of the curve parameter.
    lengths: Vec<f64>,
}

impl BezierMapping {
    pub fn new(start: Point2d, control: Point2d, end: Point2d) -> Self {
        let curve = QuadraticBezier2d::new(&[start, control, end]);
        let mut lengths = Vec::with_capacity(BEZIER_LENGTH_SAMPLES + 1);
        let mut total = 0.0;
        lengths.push(total);
        for (a, b) in (0..=BEZIER_LENGTH_SAMPLES)
            .map(|i| curve.sample(i as f64 / BEZIER_LENGTH_SAMPLES as f64))
            .tuple_windows()
        {
            total += a.distance(b);
            lengths.push(total);
        }
        Self { curve, lengths }
    }

    /// The control point of the curve offset laterally by `lateral_offset`.
    ///
    /// This is where the offset tangents at the two ends intersect, so that
    /// a quadratic curve through the offset end points keeps the end directions.
    pub fn control(&self, lateral_offset: f64) -> Point2d {
        let [start, control, end] = *self.curve.points();
        let t0 = self.tangent(0.0);
        let t1 = self.tangent(1.0);
        let p0 = start + rot90(t0) * lateral_offset;
        let p1 = end + rot90(t1) * lateral_offset;
        intersect_lines(p0, t0, p1, t1).unwrap_or(control + rot90(t0) * lateral_offset)
    }

    /// The unit tangent at curve parameter `t`.
    fn tangent(&self, t: f64) -> Vector2d {
        let d = self.curve.sample_dt(t);
        if d.magnitude2() > 1e-12 {
            d.normalize()
        } else {
            let [start, _, end] = *self.curve.points();
            let chord = end - start;
            if chord.magnitude2() > 1e-12 {
                chord.normalize()
            } else {
                Vector2d::unit_x()
            }
        }
    }

    /// Converts a longitudinal position into the curve parameter.
    fn param_at(&self, road_pos: f64) -> f64 {
        let n = self.lengths.len() - 1;
        let idx = self
            .lengths
            .partition_point(|len| *len < road_pos)
            .clamp(1, n);
        let (l0, l1) = (self.lengths[idx - 1], self.lengths[idx]);
        let frac = if l1 > l0 {
            (road_pos - l0) / (l1 - l0)
        } else {
            0.0
        };
        (idx as f64 - 1.0 + frac) / n as f64
    }
}

impl RoadCurve for BezierMapping {
    fn road_length(&self) -> f64 {
        self.lengths[self.lengths.len() - 1]
    }

    fn map(&self, road_pos: f64, lateral_offset: f64) -> PosTheta {
        let t = self.param_at(road_pos);
        let dir = self.tangent(t);
        PosTheta {
            pos: self.curve.sample(t) + rot90(dir) * lateral_offset,
            dir,
        }
    }
}

/// A road made of consecutive quadratic bezier curves.
#[derive(Clone, Debug, Default)]
pub struct PolyBezierMapping {
    beziers: Vec<BezierMapping>,
    length: f64,
}

impl PolyBezierMapping {
    pub fn new(beziers: Vec<BezierMapping>) -> Self {
        let length = beziers.iter().map(RoadCurve::road_length).sum();
        Self { beziers, length }
    }

    /// The bezier pieces, in order.
    pub fn beziers(&self) -> &[BezierMapping] {
        &self.beziers
    }
}

impl RoadCurve for PolyBezierMapping {
    fn road_length(&self) -> f64 {
        self.length
    }

    fn map(&self, road_pos: f64, lateral_offset: f64) -> PosTheta {
        match locate(&self.beziers, road_pos) {
            Some((bezier, pos)) => bezier.map(pos, lateral_offset),
            None => empty_pos(),
        }
    }
}
