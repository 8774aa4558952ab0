//! The interactive traffic view.
//!
//! The view keeps the road network, which is expensive to draw, in a
//! background raster that is only redrawn when the viewport, the transform or
//! the network changes. Every frame it copies the raster and draws the traffic
//! on top while holding the simulation lock.

use crate::canvas::{Canvas, DrawList};
use crate::config::ViewProperties;
use crate::gesture::{GestureController, PointerEvent};
use crate::painter::{RoadNetworkPainter, ScenarioPainter};
use crate::simulation::SimulationHandle;
use crate::transform::{ViewTransform, Viewport};
use log::debug;
use std::sync::Arc;
use std::time::Duration;

/// What a background raster was drawn for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterKey {
    pub viewport: Viewport,
    pub transform: ViewTransform,
    pub topology_version: u64,
}

/// The cached background layer.
#[derive(Default)]
pub struct BackgroundBuffer {
    raster: DrawList,
    key: Option<RasterKey>,
    /// Set when the raster must be redrawn whatever its key.
    force: bool,
    /// The number of times the raster has been drawn.
    regenerations: u64,
}

impl BackgroundBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// Whether the raster is out of date for `key`.
    pub fn is_stale(&self, key: &RasterKey) -> bool {
        self.force || self.key.as_ref() != Some(key)
    }

    /// Marks the raster for redrawing on the next frame.
    pub fn invalidate(&mut self) {
        self.force = true;
    }

    /// Redraws the raster if it is out of date for `key`.
    ///
    /// Returns whether the raster was redrawn.
    pub fn update(&mut self, key: RasterKey, draw: impl FnOnce(&mut DrawList)) -> bool {
        if !self.is_stale(&key) {
            return false;
        }
        debug!(
            "Redrawing background for {}x{} at scale {:.3} (topology {})",
            key.viewport.width,
            key.viewport.height,
            key.transform.scale(),
            key.topology_version
        );
        self.raster.clear_commands();
        draw(&mut self.raster);
        self.key = Some(key);
        self.force = false;
        self.regenerations += 1;
        true
    }

    pub fn raster(&self) -> &DrawList {
        &self.raster
    }

    /// The number of times the raster has been drawn.
    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }
}

/// A pan and zoom view of a running traffic simulation.
pub struct TrafficView<P: ScenarioPainter = RoadNetworkPainter> {
    handle: Arc<SimulationHandle>,
    painter: P,
    properties: ViewProperties,
    transform: ViewTransform,
    gesture: GestureController,
    background: BackgroundBuffer,
    viewport: Viewport,
}

impl TrafficView {
    /// Creates a view with the standard road network painter.
    pub fn new(handle: Arc<SimulationHandle>, properties: ViewProperties) -> Self {
        let painter = RoadNetworkPainter::new(&properties);
        Self::with_painter(handle, painter, properties)
    }
}

impl<P: ScenarioPainter> TrafficView<P> {
    /// Creates a view with a custom painter.
    pub fn with_painter(
        handle: Arc<SimulationHandle>,
        mut painter: P,
        properties: ViewProperties,
    ) -> Self {
        painter.apply_properties(&properties);
        handle.set_sleep_time(properties.initial_sleep_time);
        Self {
            handle,
            painter,
            transform: properties.initial_transform(),
            properties,
            gesture: GestureController::new(),
            background: BackgroundBuffer::new(),
            viewport: Viewport::default(),
        }
    }

    pub fn handle(&self) -> &Arc<SimulationHandle> {
        &self.handle
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn properties(&self) -> &ViewProperties {
        &self.properties
    }

    /// Resizes the view, keeping the world point at the centre of the view fixed.
    pub fn on_size_changed(&mut self, width: u32, height: u32) {
        let old = self.viewport;
        let centre = self.transform.center(old);
        self.viewport = Viewport::new(width, height);
        if old != Viewport::default() {
            self.transform.set_center(centre, self.viewport);
        }
    }

    /// Handles a pointer event; returns whether the view needs redrawing.
    pub fn on_touch_event(&mut self, event: &PointerEvent) -> bool {
        let changed = self
            .gesture
            .on_touch_event(event, &mut self.transform, self.viewport);
        if changed {
            self.background.invalidate();
        }
        changed
    }

    pub fn set_transform(&mut self, transform: ViewTransform) {
        if transform != self.transform {
            self.transform = transform;
            self.background.invalidate();
        }
    }

    /// Draws a frame.
    pub fn draw(&mut self, target: &mut dyn Canvas) {
        // The version must describe the network the background is drawn from
        let (network, topology_version) = self.handle.network_snapshot();
        let key = RasterKey {
            viewport: self.viewport,
            transform: self.transform,
            topology_version,
        };
        let painter = &mut self.painter;
        let transform = &self.transform;
        self.background.update(key, |raster| {
            painter.draw_background(&network, transform, raster)
        });

        target.draw_raster(self.background.raster());
        target.set_transform(&self.transform);
        let mut traffic = self.handle.lock_traffic();
        self.painter.draw_foreground(&network, &mut traffic, target);
    }

    /// Redraws the background on the next frame.
    pub fn force_repaint_background(&mut self) {
        self.background.invalidate();
    }

    /// Applies new viewer settings and returns to their initial transform.
    pub fn reset_graphic_properties(&mut self, properties: ViewProperties) {
        self.painter.apply_properties(&properties);
        self.transform = properties.initial_transform();
        self.properties = properties;
        self.background.invalidate();
    }

    /// The number of times the background has been drawn.
    pub fn background_regenerations(&self) -> u64 {
        self.background.regenerations()
    }

    pub fn start(&self) {
        self.handle.start();
    }

    pub fn stop(&self) {
        self.handle.stop();
    }

    pub fn pause(&self) {
        self.handle.pause();
    }

    pub fn resume(&self) {
        self.handle.resume();
    }

    /// Restarts the simulation and returns to the initial transform.
    pub fn reset(&mut self) {
        self.set_transform(self.properties.initial_transform());
        self.handle.reset();
    }

    /// Sets the pause between simulation ticks in ms.
    pub fn set_sleep_time(&self, sleep_ms: u32) {
        self.handle.set_sleep_time(sleep_ms);
    }

    pub fn sleep_time(&self) -> Duration {
        self.handle.sleep_time()
    }

    pub fn simulation_time(&self) -> f64 {
        self.handle.simulation_time()
    }

    pub fn iteration_count(&self) -> u64 {
        self.handle.iteration_count()
    }

    pub fn is_paused(&self) -> bool {
        self.handle.is_paused()
    }

    pub fn is_stopped(&self) -> bool {
        self.handle.is_stopped()
    }
}
