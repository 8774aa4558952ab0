//! The topology of the road network.
//!
//! A [RoadNetwork] is built once per scenario and then shared immutably
//! between the engine and the view; a new scenario replaces it wholesale.

use crate::mapping::RoadMapping;
use crate::RoadSegmentId;
use slotmap::SlotMap;

/// A road network.
#[derive(Default)]
pub struct RoadNetwork {
    /// The road segments in the network.
    segments: SlotMap<RoadSegmentId, RoadSegment>,
}

/// A single road segment, which may carry several lanes.
pub struct RoadSegment {
    /// The road segment ID.
    id: RoadSegmentId,
    /// The identifier shown to the user.
    user_id: String,
    /// The geometry and lane layout of the segment.
    mapping: Option<RoadMapping>,
    /// The traffic lights along the segment.
    traffic_lights: Vec<TrafficLightSite>,
    /// The speed limits along the segment.
    speed_limits: Vec<SpeedLimit>,
    /// The changes of gradient along the segment.
    slopes: Vec<Slope>,
    /// The traffic source feeding the start of the segment.
    source: Option<TrafficSource>,
    /// Whether vehicles leave the network at the end of the segment.
    sink: Option<TrafficSink>,
}

/// The attributes of a road segment.
pub struct RoadSegmentAttributes<'a> {
    /// The identifier shown to the user.
    pub user_id: &'a str,
    /// The geometry and lane layout of the segment.
    pub mapping: Option<RoadMapping>,
}

/// The location of a traffic light along a road segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrafficLightSite {
    /// The longitudinal position of the stop line in m.
    pub position: f64,
}

/// A speed limit that applies from a position onwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedLimit {
    /// The longitudinal position of the sign in m.
    pub position: f64,
    /// The speed limit in m/s.
    pub speed_limit: f64,
}

/// A road gradient that applies from a position onwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slope {
    /// The longitudinal position of the change in m.
    pub position: f64,
    /// The gradient, as rise over run.
    pub gradient: f64,
}

/// A source of new vehicles at the start of a road segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrafficSource {
    /// The total inflow in veh/s.
    pub inflow: f64,
}

/// A sink removing vehicles at the end of a road segment.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrafficSink;

impl RoadNetwork {
    /// Creates an empty road network.
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a road segment to the network.
    pub fn add_segment(&mut self, attributes: RoadSegmentAttributes) -> RoadSegmentId {
        self.segments
            .insert_with_key(|id| RoadSegment::new(id, attributes))
    }

    /// Gets a reference to the road segment with the given ID.
    pub fn segment(&self, id: RoadSegmentId) -> Option<&RoadSegment> {
        self.segments.get(id)
    }

    /// Gets a mutable reference to the road segment with the given ID.
    pub fn segment_mut(&mut self, id: RoadSegmentId) -> Option<&mut RoadSegment> {
        self.segments.get_mut(id)
    }

    /// Iterates over the road segments in the network.
    pub fn segments(&self) -> impl Iterator<Item = &RoadSegment> {
        self.segments.values()
    }

    /// The number of road segments in the network.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

impl RoadSegment {
    fn new(id: RoadSegmentId, attributes: RoadSegmentAttributes) -> Self {
        Self {
            id,
            user_id: attributes.user_id.to_owned(),
            mapping: attributes.mapping,
            traffic_lights: vec![],
            speed_limits: vec![],
            slopes: vec![],
            source: None,
            sink: None,
        }
    }

    pub fn id(&self) -> RoadSegmentId {
        self.id
    }

    /// The identifier shown to the user.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The road mapping, if one has been attached.
    pub fn try_mapping(&self) -> Option<&RoadMapping> {
        self.mapping.as_ref()
    }

    /// The road mapping.
    ///
    /// # Panics
    /// Panics if no mapping has been attached, as every segment the engine
    /// hands over must have one.
    pub fn mapping(&self) -> &RoadMapping {
        match &self.mapping {
            Some(mapping) => mapping,
            None => panic!("road segment {} has no road mapping", self.user_id),
        }
    }

    /// Attaches a road mapping, replacing any existing one.
    pub fn set_mapping(&mut self, mapping: RoadMapping) {
        self.mapping = Some(mapping);
    }

    pub fn traffic_lights(&self) -> &[TrafficLightSite] {
        &self.traffic_lights
    }

    pub fn add_traffic_light(&mut self, light: TrafficLightSite) {
        self.traffic_lights.push(light);
    }

    pub fn speed_limits(&self) -> &[SpeedLimit] {
        &self.speed_limits
    }

    pub fn add_speed_limit(&mut self, limit: SpeedLimit) {
        self.speed_limits.push(limit);
    }

    pub fn slopes(&self) -> &[Slope] {
        &self.slopes
    }

    pub fn add_slope(&mut self, slope: Slope) {
        self.slopes.push(slope);
    }

    pub fn source(&self) -> Option<&TrafficSource> {
        self.source.as_ref()
    }

    pub fn set_source(&mut self, source: Option<TrafficSource>) {
        self.source = source;
    }

    pub fn sink(&self) -> Option<&TrafficSink> {
        self.sink.as_ref()
    }

    pub fn set_sink(&mut self, sink: Option<TrafficSink>) {
        self.sink = sink;
    }
}
