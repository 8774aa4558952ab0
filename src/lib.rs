pub use canvas::{Canvas, DashPattern, DrawCommand, DrawList, Paint, PaintStyle};
pub use cgmath;
pub use color::{Color, VehicleColorMode, VehicleColorizer};
pub use config::{ConfigError, ViewProperties};
pub use gesture::{GestureController, PointerAction, PointerEvent, TouchMode};
pub use mapping::{MappingShape, PosTheta, RoadCurve, RoadMapping};
pub use network::{
    RoadNetwork, RoadSegment, RoadSegmentAttributes, Slope, SpeedLimit, TrafficLightSite,
    TrafficSink, TrafficSource,
};
pub use painter::{RoadNetworkPainter, ScenarioPainter};
pub use path::{Direction, Path, PathCommand, Rect};
pub use rasterize::{draw_road_mapping, draw_sampled};
pub use simulation::SimulationHandle;
use slotmap::new_key_type;
pub use slotmap::{Key, KeyData};
pub use traffic::{TrafficLightStatus, TrafficState, Vehicle, VehicleAttributes};
pub use transform::{ViewTransform, Viewport};
pub use util::Interval;
pub use view::{BackgroundBuffer, RasterKey, TrafficView};

pub mod canvas;
pub mod color;
pub mod config;
pub mod gesture;
pub mod mapping;
pub mod math;
pub mod network;
pub mod painter;
pub mod path;
pub mod rasterize;
pub mod simulation;
pub mod traffic;
pub mod transform;
mod util;
pub mod view;

new_key_type! {
    /// Unique ID of a [RoadSegment].
    pub struct RoadSegmentId;
    /// Unique ID of a [Vehicle].
    pub struct VehicleId;
}
