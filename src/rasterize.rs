//! Conversion of road mappings into drawable paths.
//!
//! Each mapping kind with a known shape gets an exact construction; anything
//! else is sampled at a fixed spacing and joined with straight lines.

use crate::mapping::{MappingShape, RoadCurve, RoadMapping};
use crate::path::{Direction, Path, Rect};

/// The spacing of samples when drawing a road without an exact construction, in m.
pub const SECTION_LENGTH: f64 = 20.0;

/// Appends the path of a road mapping at the given lateral offset to `path`.
///
/// Returns `None` if the mapping is a sequence with no elements,
/// in which case nothing is appended and the caller should draw nothing.
pub fn draw_road_mapping<'a>(
    path: &'a mut Path,
    mapping: &RoadMapping,
    lateral_offset: f64,
) -> Option<&'a Path> {
    match mapping.shape() {
        MappingShape::Line(line) => {
            path.move_to(line.start_pos(lateral_offset).pos);
            path.line_to(line.end_pos(lateral_offset).pos);
        }
        MappingShape::Circle(circle) => {
            path.add_circle(
                circle.centre(),
                circle.radius() + lateral_offset,
                Direction::Ccw,
            );
        }
        MappingShape::UTurn(u_turn) => {
            let straight = u_turn.straight_length();
            let radius = u_turn.radius() + lateral_offset;

            // First straight
            path.move_to(u_turn.start_pos(lateral_offset).pos);
            let turn_start = u_turn.map(straight, lateral_offset).pos;
            path.line_to(turn_start);

            // The bend
            let turn_end = u_turn
                .map(u_turn.road_length() - straight, lateral_offset)
                .pos;
            let oval = Rect::new(
                turn_start.x - radius,
                turn_start.y,
                turn_start.x + radius,
                turn_end.y,
            );
            path.add_arc(oval, 90.0, 180.0);

            // Second straight
            path.move_to(turn_end);
            path.line_to(u_turn.end_pos(lateral_offset).pos);
        }
        MappingShape::Arc(arc) => {
            let (start, sweep) = if arc.clockwise() {
                (-arc.start_angle() - 0.5 * std::f64::consts::PI, -arc.arc_angle())
            } else {
                (arc.start_angle() + 0.5 * std::f64::consts::PI, arc.arc_angle())
            };
            let radius = arc.radius() + lateral_offset;
            let centre = arc.centre();
            let oval = Rect::new(
                centre.x - radius,
                centre.y - radius,
                centre.x + radius,
                centre.y + radius,
            );
            path.add_arc(oval, start.to_degrees(), sweep.to_degrees());
        }
        MappingShape::PolyLine(poly) => {
            let first = poly.lines().first()?;
            path.move_to(first.start_pos(lateral_offset).pos);
            for line in poly.lines() {
                path.line_to(line.end_pos(lateral_offset).pos);
            }
        }
        MappingShape::PolyBezier(poly) => {
            let first = poly.beziers().first()?;
            path.move_to(first.start_pos(lateral_offset).pos);
            for bezier in poly.beziers() {
                path.quad_to(
                    bezier.control(lateral_offset),
                    bezier.end_pos(lateral_offset).pos,
                );
            }
        }
        MappingShape::Other(curve) => {
            draw_sampled(path, curve.as_ref(), lateral_offset);
        }
    }
    Some(path)
}

/// Appends straight sections joining samples taken every [SECTION_LENGTH] m along the curve.
///
/// Works for any curve; the last sample may lie past the end of the road.
pub fn draw_sampled<'a>(
    path: &'a mut Path,
    curve: &dyn RoadCurve,
    lateral_offset: f64,
) -> &'a Path {
    let road_length = curve.road_length();
    let mut road_pos = 0.0;
    path.move_to(curve.map(road_pos, lateral_offset).pos);
    while road_pos < road_length {
        road_pos += SECTION_LENGTH;
        path.line_to(curve.map(road_pos, lateral_offset).pos);
    }
    path
}
