//! Road mappings: parametric descriptions of a road segment's centre line
//! and the lanes laid out around it.

pub use arc::ArcMapping;
pub use circle::CircleMapping;
pub use line::LineMapping;
pub use poly::{BezierMapping, PolyBezierMapping, PolyLineMapping};
pub use sampled::SampledCurve;
pub use u_turn::UTurnMapping;

use crate::math::{Point2d, Vector2d};
use crate::traffic::Vehicle;

mod arc;
mod circle;
mod line;
mod poly;
mod sampled;
mod u_turn;

/// A position on a road mapping together with the heading of the road there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PosTheta {
    /// The world space position.
    pub pos: Point2d,
    /// The unit vector in the direction of travel.
    pub dir: Vector2d,
}

/// A curve parametrised by the longitudinal position along a road.
///
/// Positive lateral offsets displace the point along the left normal of the direction of
/// travel, except where a mapping documents that it measures offsets away from a centre.
pub trait RoadCurve {
    /// The length of the road in m.
    fn road_length(&self) -> f64;

    /// Maps a longitudinal position and lateral offset to world space.
    ///
    /// # Parameters
    /// * `road_pos` - The longitudinal position along the road, in m
    /// * `lateral_offset` - The perpendicular displacement from the centre line, in m
    fn map(&self, road_pos: f64, lateral_offset: f64) -> PosTheta;

    /// Maps the start of the road.
    fn start_pos(&self, lateral_offset: f64) -> PosTheta {
        self.map(0.0, lateral_offset)
    }

    /// Maps the end of the road.
    fn end_pos(&self, lateral_offset: f64) -> PosTheta {
        self.map(self.road_length(), lateral_offset)
    }
}

/// The closed set of road mapping kinds.
///
/// Every kind except [MappingShape::Other] has an exact path construction;
/// `Other` is drawn by sampling.
pub enum MappingShape {
    Line(LineMapping),
    Circle(CircleMapping),
    UTurn(UTurnMapping),
    Arc(ArcMapping),
    PolyLine(PolyLineMapping),
    PolyBezier(PolyBezierMapping),
    Other(Box<dyn RoadCurve + Send + Sync>),
}

impl MappingShape {
    /// Wraps an arbitrary curve as an opaque mapping.
    pub fn other(curve: impl RoadCurve + Send + Sync + 'static) -> Self {
        MappingShape::Other(Box::new(curve))
    }

    /// The underlying curve.
    pub fn curve(&self) -> &dyn RoadCurve {
        match self {
            MappingShape::Line(m) => m,
            MappingShape::Circle(m) => m,
            MappingShape::UTurn(m) => m,
            MappingShape::Arc(m) => m,
            MappingShape::PolyLine(m) => m,
            MappingShape::PolyBezier(m) => m,
            MappingShape::Other(m) => m.as_ref(),
        }
    }
}

macro_rules! impl_from_mapping {
    ($($variant:ident($ty:ty)),*) => {
        $(impl From<$ty> for MappingShape {
            fn from(mapping: $ty) -> Self {
                MappingShape::$variant(mapping)
            }
        })*
    };
}

impl_from_mapping!(
    Line(LineMapping),
    Circle(CircleMapping),
    UTurn(UTurnMapping),
    Arc(ArcMapping),
    PolyLine(PolyLineMapping),
    PolyBezier(PolyBezierMapping)
);

/// The geometry of a road segment: its centre line and lane layout.
///
/// Lanes are numbered from the right-hand edge of the road, starting at zero.
/// Lane edge `i` lies between lanes `i - 1` and `i`; edges `0` and `lane_count`
/// are the road edges.
pub struct RoadMapping {
    shape: MappingShape,
    lane_count: u32,
    lane_width: f64,
    exit_lanes: u32,
}

impl RoadMapping {
    /// Creates a road mapping.
    pub fn new(shape: impl Into<MappingShape>, lane_count: u32, lane_width: f64) -> Self {
        Self {
            shape: shape.into(),
            lane_count,
            lane_width,
            exit_lanes: 0,
        }
    }

    /// Marks the rightmost `exit_lanes` lanes as exit lanes.
    pub fn with_exit_lanes(mut self, exit_lanes: u32) -> Self {
        self.exit_lanes = exit_lanes.min(self.lane_count);
        self
    }

    /// The kind of mapping.
    pub fn shape(&self) -> &MappingShape {
        &self.shape
    }

    pub fn lane_count(&self) -> u32 {
        self.lane_count
    }

    /// The width of a single lane in m.
    pub fn lane_width(&self) -> f64 {
        self.lane_width
    }

    /// The number of exit lanes on the right-hand side.
    pub fn exit_lanes(&self) -> u32 {
        self.exit_lanes
    }

    /// The total width of the road in m.
    pub fn road_width(&self) -> f64 {
        self.lane_count as f64 * self.lane_width
    }

    /// The lateral offset of lane edge `lane`.
    pub fn lane_inside_edge_offset(&self, lane: u32) -> f64 {
        (lane as f64 - 0.5 * self.lane_count as f64) * self.lane_width
    }

    /// The lateral offset of the centre of lane `lane`.
    pub fn lane_centre_offset(&self, lane: u32) -> f64 {
        self.lane_inside_edge_offset(lane) + 0.5 * self.lane_width
    }

    /// Maps a vehicle to its quadrilateral in world space.
    ///
    /// Points 0 and 1 are at the front of the vehicle, points 2 and 3 at the rear.
    pub fn map_vehicle(&self, vehicle: &Vehicle) -> [Point2d; 4] {
        let offset = self.lane_centre_offset(vehicle.lane());
        let half_width = 0.5 * vehicle.width();
        let front = vehicle.pos_front();
        let rear = vehicle.pos_rear();
        [
            self.map(front, offset + half_width).pos,
            self.map(front, offset - half_width).pos,
            self.map(rear, offset - half_width).pos,
            self.map(rear, offset + half_width).pos,
        ]
    }
}

impl RoadCurve for RoadMapping {
    fn road_length(&self) -> f64 {
        self.shape.curve().road_length()
    }

    fn map(&self, road_pos: f64, lateral_offset: f64) -> PosTheta {
        self.shape.curve().map(road_pos, lateral_offset)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::traffic::VehicleAttributes;
    use assert_approx_eq::assert_approx_eq;

    fn straight_road() -> RoadMapping {
        let line = LineMapping::from_ends(Point2d::new(0.0, 0.0), Point2d::new(100.0, 0.0));
        RoadMapping::new(line, 2, 4.0)
    }

    #[test]
    fn lane_edges_span_road_width() {
        let mapping = straight_road();
        assert_approx_eq!(mapping.road_width(), 8.0);
        assert_approx_eq!(mapping.lane_inside_edge_offset(0), -4.0);
        assert_approx_eq!(mapping.lane_inside_edge_offset(1), 0.0);
        assert_approx_eq!(mapping.lane_inside_edge_offset(2), 4.0);
        assert_approx_eq!(mapping.lane_centre_offset(0), -2.0);
    }

    #[test]
    fn vehicle_quad_front_then_rear() {
        let mapping = straight_road();
        let mut vehicle = Vehicle::new(&VehicleAttributes {
            length: 5.0,
            width: 2.0,
        });
        vehicle.set_location(1, 50.0);
        let quad = mapping.map_vehicle(&vehicle);

        assert_approx_eq!(quad[0].x, 50.0);
        assert_approx_eq!(quad[1].x, 50.0);
        assert_approx_eq!(quad[2].x, 45.0);
        assert_approx_eq!(quad[3].x, 45.0);
        // Lane 1 is centred 2 m left of the centre line
        assert_approx_eq!(quad[0].y, 3.0);
        assert_approx_eq!(quad[1].y, 1.0);
    }

    #[test]
    fn exit_lanes_are_capped() {
        let mapping = straight_road().with_exit_lanes(5);
        assert_eq!(mapping.exit_lanes(), 2);
    }
}
