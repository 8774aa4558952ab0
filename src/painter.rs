//! Painting the road network and the traffic on it.

use crate::canvas::{Canvas, DashPattern, Paint, PaintStyle};
use crate::color::{Color, VehicleColorizer};
use crate::config::ViewProperties;
use crate::mapping::{RoadCurve, RoadMapping};
use crate::math::{Point2d, Vector2d};
use crate::network::{RoadNetwork, RoadSegment};
use crate::path::{Path, Rect};
use crate::rasterize::{draw_road_mapping, draw_sampled};
use crate::traffic::{TrafficLightStatus, TrafficState};
use crate::transform::ViewTransform;
use log::warn;
use rand::rngs::ThreadRng;
use rand::Rng;

/// Speed limits at or above this value in km/h are drawn as end-of-limit signs.
const NO_SPEED_LIMIT_KMH: f64 = 150.0;

/// Offset of the road id label from the start of the segment.
const ROAD_ID_OFFSET: f64 = 16.0;

const ROAD_ID_TEXT_SIZE: f64 = 12.0;
const INFLOW_TEXT_SIZE: f64 = 20.0;

/// The width of the stroke marking a lit brake light.
const BRAKE_LIGHT_WIDTH: f64 = 1.0;

/// Draws a scenario in two layers.
///
/// The background holds everything that only changes with the road network
/// and is drawn rarely; the foreground holds the traffic and is drawn every frame.
pub trait ScenarioPainter {
    /// Draws the static layer, starting with a clear and the view transform.
    fn draw_background(
        &mut self,
        network: &RoadNetwork,
        transform: &ViewTransform,
        canvas: &mut dyn Canvas,
    );

    /// Draws the moving layer on top of the background.
    ///
    /// The caller must hold the simulation lock that guards `traffic`.
    fn draw_foreground(
        &mut self,
        network: &RoadNetwork,
        traffic: &mut TrafficState,
        canvas: &mut dyn Canvas,
    );

    /// Applies changed viewer settings.
    fn apply_properties(&mut self, properties: &ViewProperties);
}

/// The painter for ordinary road networks.
pub struct RoadNetworkPainter<R = ThreadRng> {
    properties: ViewProperties,
    colorizer: VehicleColorizer<R>,
    road_path: Path,
    line_path: Path,
    vehicle_path: Path,
}

impl RoadNetworkPainter {
    pub fn new(properties: &ViewProperties) -> Self {
        Self::with_rng(properties, rand::thread_rng())
    }
}

impl<R: Rng> RoadNetworkPainter<R> {
    /// Creates a painter which draws vehicle colours from the given generator.
    pub fn with_rng(properties: &ViewProperties, rng: R) -> Self {
        Self {
            properties: properties.clone(),
            colorizer: VehicleColorizer::with_rng(
                properties.vehicle_color_mode,
                properties.vmax_for_color_spectrum,
                rng,
            ),
            road_path: Path::new(),
            line_path: Path::new(),
            vehicle_path: Path::new(),
        }
    }

    pub fn properties(&self) -> &ViewProperties {
        &self.properties
    }

    fn draw_sources(&mut self, network: &RoadNetwork, canvas: &mut dyn Canvas) {
        let paint = Paint::fill(self.properties.source_color);
        let label = Paint::fill(Color::BLACK).with_text_size(INFLOW_TEXT_SIZE);
        for segment in network.segments() {
            if let Some(source) = segment.source() {
                let mapping = segment.mapping();
                let radius = terminal_radius(mapping);
                let pos = mapping.start_pos(0.0).pos;
                canvas.draw_circle(pos, radius, &paint);
                let text = format!("inflow: {} veh/h", (3600.0 * source.inflow) as i64);
                canvas.draw_text(&text, pos + Vector2d::new(radius, radius), &label);
            }
        }
    }

    fn draw_sinks(&mut self, network: &RoadNetwork, canvas: &mut dyn Canvas) {
        let paint = Paint::fill(self.properties.sink_color);
        for segment in network.segments() {
            if segment.sink().is_some() {
                let mapping = segment.mapping();
                canvas.draw_circle(mapping.end_pos(0.0).pos, terminal_radius(mapping), &paint);
            }
        }
    }

    fn draw_speed_limits(&mut self, network: &RoadNetwork, canvas: &mut dyn Canvas) {
        for segment in network.segments() {
            let mapping = segment.mapping();
            let lane_width = mapping.lane_width();
            let offset = -(0.5 * mapping.lane_count() as f64 + 1.5) * lane_width;
            for limit in segment.speed_limits() {
                let pos = mapping.map(limit.position, offset).pos;
                let kmh = 3.6 * limit.speed_limit;
                if kmh < NO_SPEED_LIMIT_KMH {
                    canvas.draw_circle(pos, 1.5 * lane_width, &Paint::fill(SIGN_RED));
                    canvas.draw_circle(pos, lane_width, &Paint::fill(SIGN_WHITE));
                    let text = format!("{}", kmh.round() as i64);
                    let label = Paint::fill(Color::BLACK).with_text_size(lane_width);
                    canvas.draw_text(&text, pos, &label);
                } else {
                    canvas.draw_circle(pos, 1.5 * lane_width, &Paint::fill(SIGN_WHITE));
                    self.line_path.clear();
                    self.line_path.move_to(pos + Vector2d::new(-lane_width, lane_width));
                    self.line_path.line_to(pos + Vector2d::new(lane_width, -lane_width));
                    canvas.draw_path(
                        &self.line_path,
                        &Paint::stroke(Color::BLACK, 0.2 * lane_width),
                    );
                }
            }
        }
    }

    fn draw_slopes(&mut self, network: &RoadNetwork, canvas: &mut dyn Canvas) {
        let label = Paint::fill(Color::BLACK);
        for segment in network.segments() {
            let mapping = segment.mapping();
            let offset = -(0.5 * mapping.lane_count() as f64 + 1.5) * (mapping.lane_width() + 1.0);
            for slope in segment.slopes() {
                let percent = (100.0 * slope.gradient) as i64;
                if percent != 0 {
                    let pos = mapping.map(slope.position, offset).pos;
                    canvas.draw_text(&format!("{} %", percent), pos, &label);
                }
            }
        }
    }

    fn draw_road_ids(&mut self, network: &RoadNetwork, canvas: &mut dyn Canvas) {
        let label = Paint::fill(Color::BLACK).with_text_size(ROAD_ID_TEXT_SIZE);
        for segment in network.segments() {
            let pos = segment.mapping().map(0.0, 0.0).pos;
            canvas.draw_text(
                segment.user_id(),
                pos + Vector2d::new(ROAD_ID_OFFSET, ROAD_ID_OFFSET),
                &label,
            );
        }
    }

    fn draw_road_segment(&mut self, segment: &RoadSegment, canvas: &mut dyn Canvas) {
        let mapping = segment.mapping();
        let properties = &self.properties;

        // Pavement
        rasterize(&mut self.road_path, segment, 0.0);
        canvas.draw_path(
            &self.road_path,
            &Paint::stroke(properties.road_color, mapping.road_width()),
        );

        // Lane lines
        let lane_count = mapping.lane_count();
        for lane in 1..lane_count {
            let gap = if lane == mapping.exit_lanes() {
                properties.gap_length_exit
            } else {
                properties.gap_length
            };
            let paint = Paint::stroke(properties.road_line_color, properties.line_width)
                .with_dash(Some(DashPattern {
                    on: properties.line_length,
                    off: gap,
                }));
            rasterize(&mut self.line_path, segment, mapping.lane_inside_edge_offset(lane));
            canvas.draw_path(&self.line_path, &paint);
        }

        // Road edges
        let paint = Paint::stroke(properties.road_edge_color, properties.line_width);
        for edge in [0, lane_count] {
            rasterize(&mut self.line_path, segment, mapping.lane_inside_edge_offset(edge));
            canvas.draw_path(&self.line_path, &paint);
        }

        // Traffic light housings
        let paint = Paint::fill(Color::DARK_GRAY);
        for site in segment.traffic_lights() {
            let (pos, half_size) = light_location(mapping, site.position);
            canvas.draw_rect(Rect::around(pos, half_size), &paint);
        }
    }

    fn draw_light_lamps(
        &mut self,
        segment: &RoadSegment,
        traffic: &TrafficState,
        canvas: &mut dyn Canvas,
    ) {
        let mapping = segment.mapping();
        for (index, site) in segment.traffic_lights().iter().enumerate() {
            let color = match traffic.light_state(segment.id(), index) {
                TrafficLightStatus::Green => Color::GREEN,
                TrafficLightStatus::Red => Color::RED,
                TrafficLightStatus::RedGreen => Color::MAGENTA,
                TrafficLightStatus::GreenRed => Color::YELLOW,
            };
            let (pos, radius) = light_location(mapping, site.position);
            canvas.draw_circle(pos, radius, &Paint::fill(color));
        }
    }
}

impl<R: Rng> ScenarioPainter for RoadNetworkPainter<R> {
    fn draw_background(
        &mut self,
        network: &RoadNetwork,
        transform: &ViewTransform,
        canvas: &mut dyn Canvas,
    ) {
        canvas.clear(self.properties.background_color);
        canvas.set_transform(transform);

        if self.properties.draw_sources {
            self.draw_sources(network, canvas);
        }
        if self.properties.draw_sinks {
            self.draw_sinks(network, canvas);
        }
        if self.properties.draw_speed_limits {
            self.draw_speed_limits(network, canvas);
        }
        if self.properties.draw_slopes {
            self.draw_slopes(network, canvas);
        }
        if self.properties.draw_road_id {
            self.draw_road_ids(network, canvas);
        }
        for segment in network.segments() {
            self.draw_road_segment(segment, canvas);
        }
    }

    fn draw_foreground(
        &mut self,
        network: &RoadNetwork,
        traffic: &mut TrafficState,
        canvas: &mut dyn Canvas,
    ) {
        for segment in network.segments() {
            let mapping = segment.mapping();
            let colorizer = &mut self.colorizer;
            let path = &mut self.vehicle_path;
            traffic.for_each_vehicle_on(segment.id(), |vehicle| {
                let quad = mapping.map_vehicle(vehicle);
                let color = colorizer.vehicle_color(vehicle);
                path.clear();
                path.add_polygon(&quad);
                canvas.draw_path(path, &Paint::fill(color).with_style(PaintStyle::FillAndStroke));
                if vehicle.is_brake_light_on() {
                    // Points 2 and 3 are the rear corners
                    path.clear();
                    path.move_to(quad[2]);
                    path.line_to(quad[3]);
                    canvas.draw_path(path, &Paint::stroke(Color::RED, BRAKE_LIGHT_WIDTH));
                }
            });
        }
        for segment in network.segments() {
            self.draw_light_lamps(segment, traffic, canvas);
        }
    }

    fn apply_properties(&mut self, properties: &ViewProperties) {
        self.properties = properties.clone();
        self.colorizer.set_mode(properties.vehicle_color_mode);
        self.colorizer.set_vmax(properties.vmax_for_color_spectrum);
    }
}

const SIGN_RED: Color = Color::rgb(0xee, 0x11, 0x11);
const SIGN_WHITE: Color = Color::rgb(0xee, 0xee, 0xee);

/// The radius of the disc marking a source or sink.
fn terminal_radius(mapping: &RoadMapping) -> f64 {
    (mapping.lane_count() as f64 + 2.0) * mapping.lane_width()
}

/// The centre and half size of a traffic light beside the road.
fn light_location(mapping: &RoadMapping, position: f64) -> (Point2d, f64) {
    let offset = (0.5 * mapping.lane_count() as f64 + 1.5) * mapping.lane_width();
    (mapping.map(position, offset).pos, 0.9 * mapping.lane_width())
}

/// Rebuilds `path` as the road segment's geometry at a lateral offset.
///
/// Mappings without an exact construction are sampled, so a segment with an
/// empty sequence mapping degenerates to a single point.
fn rasterize(path: &mut Path, segment: &RoadSegment, lateral_offset: f64) {
    let mapping = segment.mapping();
    path.clear();
    if draw_road_mapping(path, mapping, lateral_offset).is_none() {
        warn!("Road segment {} has no geometry to draw", segment.user_id());
        draw_sampled(path, mapping, lateral_offset);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::canvas::{DrawCommand, DrawList};
    use crate::mapping::{LineMapping, PolyLineMapping};
    use crate::network::{
        RoadSegmentAttributes, SpeedLimit, TrafficLightSite, TrafficSink, TrafficSource,
    };
    use crate::path::PathCommand;
    use crate::traffic::{Vehicle, VehicleAttributes};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn painter(properties: &ViewProperties) -> RoadNetworkPainter<StdRng> {
        let rng = StdRng::from_seed(*b"Vegemite sandwhich is not fun...");
        RoadNetworkPainter::with_rng(properties, rng)
    }

    fn straight_network(lane_count: u32) -> RoadNetwork {
        let mut network = RoadNetwork::new();
        network.add_segment(RoadSegmentAttributes {
            user_id: "1",
            mapping: Some(RoadMapping::new(
                LineMapping::new(Point2d::new(0.0, 0.0), 0.0, 100.0),
                lane_count,
                3.0,
            )),
        });
        network
    }

    fn paths(list: &DrawList) -> Vec<(&Path, &Paint)> {
        list.commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Path { path, paint } => Some((path, paint)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn road_lines_follow_lane_layout() {
        let properties = ViewProperties::default();
        let mut network = RoadNetwork::new();
        network.add_segment(RoadSegmentAttributes {
            user_id: "1",
            mapping: Some(
                RoadMapping::new(LineMapping::new(Point2d::new(0.0, 0.0), 0.0, 100.0), 3, 3.0)
                    .with_exit_lanes(1),
            ),
        });
        let mut list = DrawList::new();
        painter(&properties).draw_background(&network, &ViewTransform::default(), &mut list);

        let paths = paths(&list);
        // Pavement, two lane lines, two edges
        assert_eq!(paths.len(), 5);
        assert_eq!(paths[0].1.stroke_width, 9.0);
        assert_eq!(paths[0].1.color, properties.road_color);

        let dash = |i: usize| paths[i].1.dash.unwrap();
        assert_eq!(dash(1).off, properties.gap_length_exit);
        assert_eq!(dash(2).off, properties.gap_length);
        assert_eq!(dash(2).on, properties.line_length);
        assert!(paths[3].1.dash.is_none());
        assert_eq!(paths[4].1.color, properties.road_edge_color);

        // Lines are at the lane boundaries
        let y = |i: usize| paths[i].0.start_point().unwrap().y;
        assert_eq!(y(3), -4.5);
        assert_eq!(y(1), -1.5);
        assert_eq!(y(2), 1.5);
        assert_eq!(y(4), 4.5);
    }

    #[test]
    fn disabled_overlays_are_not_drawn() {
        let properties = ViewProperties {
            draw_road_id: false,
            draw_sources: false,
            draw_sinks: false,
            draw_speed_limits: false,
            draw_slopes: false,
            ..ViewProperties::default()
        };
        let mut network = straight_network(1);
        let id = network.segments().next().unwrap().id();
        let segment = network.segment_mut(id).unwrap();
        segment.set_source(Some(TrafficSource { inflow: 0.5 }));
        segment.set_sink(Some(TrafficSink));
        segment.add_speed_limit(SpeedLimit {
            position: 10.0,
            speed_limit: 20.0,
        });

        let mut list = DrawList::new();
        painter(&properties).draw_background(&network, &ViewTransform::default(), &mut list);
        assert!(list
            .commands()
            .iter()
            .all(|c| !matches!(c, DrawCommand::Circle { .. } | DrawCommand::Text { .. })));
    }

    #[test]
    fn speed_limit_signs() {
        let mut network = straight_network(2);
        let id = network.segments().next().unwrap().id();
        let segment = network.segment_mut(id).unwrap();
        segment.add_speed_limit(SpeedLimit {
            position: 10.0,
            speed_limit: 80.0 / 3.6,
        });
        segment.add_speed_limit(SpeedLimit {
            position: 50.0,
            speed_limit: 200.0 / 3.6,
        });

        let mut list = DrawList::new();
        let properties = ViewProperties {
            draw_road_id: false,
            ..ViewProperties::default()
        };
        painter(&properties).draw_background(&network, &ViewTransform::default(), &mut list);

        let texts = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(texts, ["80"]);
        let discs = list
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count();
        assert_eq!(discs, 3);
    }

    #[test]
    fn empty_geometry_draws_a_point() {
        let mut network = RoadNetwork::new();
        network.add_segment(RoadSegmentAttributes {
            user_id: "empty",
            mapping: Some(RoadMapping::new(PolyLineMapping::default(), 1, 3.0)),
        });
        let properties = ViewProperties {
            draw_road_id: false,
            ..ViewProperties::default()
        };
        let mut list = DrawList::new();
        painter(&properties).draw_background(&network, &ViewTransform::default(), &mut list);
        for (path, _) in paths(&list) {
            assert!(path
                .commands()
                .iter()
                .all(|c| matches!(c, PathCommand::MoveTo(_))));
        }
    }

    #[test]
    fn foreground_draws_vehicles_then_lamps() {
        let mut network = straight_network(2);
        let id = network.segments().next().unwrap().id();
        network
            .segment_mut(id)
            .unwrap()
            .add_traffic_light(TrafficLightSite { position: 90.0 });

        let mut traffic = TrafficState::new();
        let mut vehicle = Vehicle::new(&VehicleAttributes {
            length: 5.0,
            width: 2.0,
        });
        vehicle.set_location(0, 50.0);
        vehicle.set_brake_light(true);
        traffic.add_vehicle(id, vehicle);
        traffic.set_light_states(id, [TrafficLightStatus::RedGreen]);

        let mut list = DrawList::new();
        painter(&ViewProperties::default()).draw_foreground(&network, &mut traffic, &mut list);

        let commands = list.commands();
        assert_eq!(commands.len(), 3);
        match &commands[0] {
            DrawCommand::Path { path, paint } => {
                assert_eq!(path.commands().len(), 5);
                assert_eq!(paint.style, PaintStyle::FillAndStroke);
                // Stationary vehicles are black in the velocity spectrum
                assert_eq!(paint.color, Color::BLACK);
            }
            other => panic!("unexpected command {:?}", other),
        }
        match &commands[1] {
            DrawCommand::Path { path, paint } => {
                assert_eq!(paint.color, Color::RED);
                assert_eq!(path.start_point().unwrap().x, 45.0);
                assert_eq!(path.end_point().unwrap().x, 45.0);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(matches!(
            commands[2],
            DrawCommand::Circle { paint, .. } if paint.color == Color::MAGENTA
        ));
    }

    #[test]
    fn apply_properties_changes_colour_mode() {
        let network = straight_network(1);
        let id = network.segments().next().unwrap().id();
        let mut traffic = TrafficState::new();
        traffic.add_vehicle(
            id,
            Vehicle::new(&VehicleAttributes {
                length: 5.0,
                width: 2.0,
            }),
        );

        let mut painter = painter(&ViewProperties::default());
        painter.apply_properties(&ViewProperties {
            vehicle_color_mode: crate::color::VehicleColorMode::AccelerationColor,
            ..ViewProperties::default()
        });
        let mut list = DrawList::new();
        painter.draw_foreground(&network, &mut traffic, &mut list);
        match &list.commands()[0] {
            // Zero acceleration is cruising
            DrawCommand::Path { paint, .. } => assert_eq!(paint.color, Color::BLACK),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
