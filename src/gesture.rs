//! Pan and pinch-zoom gestures.

use crate::math::Point2d;
use crate::transform::{ViewTransform, Viewport};
use arrayvec::ArrayVec;
use cgmath::MetricSpace;
use log::debug;

/// The minimum distance between two pointers, in px, for a pinch to count as a zoom.
pub const ZOOM_HYSTERESIS: f64 = 10.0;

/// The kind of a pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerAction {
    /// The first pointer went down.
    Down,
    /// Another pointer went down while one was already down.
    PointerDown,
    Move,
    /// The last pointer went up.
    Up,
    /// A pointer went up while another stays down.
    PointerUp,
}

/// A pointer event, with the screen positions of the first two pointers.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub pointers: ArrayVec<Point2d, 2>,
}

impl PointerEvent {
    /// Creates an event; pointers beyond the second are ignored.
    pub fn new(action: PointerAction, pointers: &[Point2d]) -> Self {
        Self {
            action,
            pointers: pointers.iter().copied().take(2).collect(),
        }
    }

    pub fn down(p: Point2d) -> Self {
        Self::new(PointerAction::Down, &[p])
    }

    pub fn pointer_down(p0: Point2d, p1: Point2d) -> Self {
        Self::new(PointerAction::PointerDown, &[p0, p1])
    }

    pub fn moved(pointers: &[Point2d]) -> Self {
        Self::new(PointerAction::Move, pointers)
    }

    pub fn up(p: Point2d) -> Self {
        Self::new(PointerAction::Up, &[p])
    }

    pub fn pointer_up(p0: Point2d, p1: Point2d) -> Self {
        Self::new(PointerAction::PointerUp, &[p0, p1])
    }

    /// The distance between the first two pointers, if there are two.
    fn spacing(&self) -> Option<f64> {
        match self.pointers.as_slice() {
            [p0, p1] => Some(p0.distance(*p1)),
            _ => None,
        }
    }
}

/// What the current gesture is doing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TouchMode {
    #[default]
    None,
    Drag,
    Zoom,
}

/// Turns pointer events into changes of a [ViewTransform].
#[derive(Clone, Debug)]
pub struct GestureController {
    mode: TouchMode,
    /// Where the drag started, in screen coordinates.
    start_drag: Point2d,
    x_offset_save: f64,
    y_offset_save: f64,
    scale_save: f64,
    /// The pointer spacing when the pinch started, in px.
    pinch_distance: f64,
}

impl GestureController {
    pub fn new() -> Self {
        Self {
            mode: TouchMode::None,
            start_drag: Point2d::new(0.0, 0.0),
            x_offset_save: 0.0,
            y_offset_save: 0.0,
            scale_save: 1.0,
            pinch_distance: 0.0,
        }
    }

    pub fn mode(&self) -> TouchMode {
        self.mode
    }

    /// Applies a pointer event to the transform.
    ///
    /// Returns whether the transform changed.
    pub fn on_touch_event(
        &mut self,
        event: &PointerEvent,
        transform: &mut ViewTransform,
        viewport: Viewport,
    ) -> bool {
        match event.action {
            PointerAction::Down => {
                if let Some(p) = event.pointers.first() {
                    self.start_drag = *p;
                    self.x_offset_save = transform.x_offset();
                    self.y_offset_save = transform.y_offset();
                    self.set_mode(TouchMode::Drag);
                }
                false
            }
            PointerAction::Up | PointerAction::PointerUp => {
                self.set_mode(TouchMode::None);
                false
            }
            PointerAction::PointerDown => {
                // A pinch in progress keeps its anchor
                match event.spacing() {
                    Some(spacing) if spacing > ZOOM_HYSTERESIS && self.mode != TouchMode::Zoom => {
                        self.pinch_distance = spacing;
                        self.scale_save = transform.scale();
                        self.set_mode(TouchMode::Zoom);
                    }
                    _ => {}
                }
                false
            }
            PointerAction::Move => match self.mode {
                TouchMode::None => false,
                TouchMode::Drag => {
                    let Some(p) = event.pointers.first() else {
                        return false;
                    };
                    let delta = (*p - self.start_drag) / transform.scale();
                    let x_offset = self.x_offset_save + delta.x;
                    let y_offset = self.y_offset_save + delta.y;
                    if x_offset == transform.x_offset() && y_offset == transform.y_offset() {
                        return false;
                    }
                    transform.set_offset(x_offset, y_offset);
                    true
                }
                TouchMode::Zoom => match event.spacing() {
                    Some(spacing) if spacing > ZOOM_HYSTERESIS => {
                        let scale = spacing / self.pinch_distance * self.scale_save;
                        transform.set_scale(scale, viewport)
                    }
                    _ => false,
                },
            },
        }
    }

    fn set_mode(&mut self, mode: TouchMode) {
        if mode != self.mode {
            debug!("Touch mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    const VIEWPORT: Viewport = Viewport {
        width: 400,
        height: 400,
    };

    fn p(x: f64, y: f64) -> Point2d {
        Point2d::new(x, y)
    }

    fn touch(
        gesture: &mut GestureController,
        transform: &mut ViewTransform,
        event: PointerEvent,
    ) -> bool {
        gesture.on_touch_event(&event, transform, VIEWPORT)
    }

    #[test]
    fn drag_pans_by_screen_delta_over_scale() {
        let mut transform = ViewTransform::new(2.0, 5.0, 7.0);
        let mut gesture = GestureController::new();

        assert!(!touch(&mut gesture, &mut transform, PointerEvent::down(p(100.0, 100.0))));
        assert_eq!(gesture.mode(), TouchMode::Drag);
        assert!(touch(&mut gesture, &mut transform, PointerEvent::moved(&[p(140.0, 80.0)])));
        assert_approx_eq!(transform.x_offset(), 25.0);
        assert_approx_eq!(transform.y_offset(), -3.0);

        // Offsets are relative to the anchor, not the previous move
        touch(&mut gesture, &mut transform, PointerEvent::moved(&[p(120.0, 100.0)]));
        assert_approx_eq!(transform.x_offset(), 15.0);
        assert_approx_eq!(transform.y_offset(), 7.0);

        touch(&mut gesture, &mut transform, PointerEvent::up(p(120.0, 100.0)));
        assert_eq!(gesture.mode(), TouchMode::None);
        assert!(!touch(&mut gesture, &mut transform, PointerEvent::moved(&[p(300.0, 300.0)])));
        assert_approx_eq!(transform.x_offset(), 15.0);
    }

    #[test]
    fn drag_is_inversely_proportional_to_scale() {
        let drag = |scale: f64| {
            let mut transform = ViewTransform::new(scale, 0.0, 0.0);
            let mut gesture = GestureController::new();
            touch(&mut gesture, &mut transform, PointerEvent::down(p(0.0, 0.0)));
            touch(&mut gesture, &mut transform, PointerEvent::moved(&[p(30.0, 0.0)]));
            transform.x_offset()
        };
        let (s1, s2) = (0.5, 4.0);
        assert_approx_eq!(drag(s1) / drag(s2), s2 / s1);
    }

    #[test]
    fn stationary_pointer_changes_nothing() {
        let mut transform = ViewTransform::new(1.0, 0.0, 0.0);
        let mut gesture = GestureController::new();
        touch(&mut gesture, &mut transform, PointerEvent::down(p(10.0, 10.0)));
        assert!(!touch(&mut gesture, &mut transform, PointerEvent::moved(&[p(10.0, 10.0)])));
    }

    #[test]
    fn pinch_zooms_relative_to_start() {
        let mut transform = ViewTransform::new(0.5, 0.0, 0.0);
        let mut gesture = GestureController::new();

        touch(&mut gesture, &mut transform, PointerEvent::down(p(100.0, 200.0)));
        let event = PointerEvent::pointer_down(p(100.0, 200.0), p(200.0, 200.0));
        touch(&mut gesture, &mut transform, event);
        assert_eq!(gesture.mode(), TouchMode::Zoom);

        let event = PointerEvent::moved(&[p(50.0, 200.0), p(250.0, 200.0)]);
        assert!(touch(&mut gesture, &mut transform, event));
        assert_approx_eq!(transform.scale(), 1.0);

        let event = PointerEvent::moved(&[p(125.0, 200.0), p(175.0, 200.0)]);
        assert!(touch(&mut gesture, &mut transform, event));
        assert_approx_eq!(transform.scale(), 0.25);

        let event = PointerEvent::pointer_up(p(125.0, 200.0), p(175.0, 200.0));
        touch(&mut gesture, &mut transform, event);
        assert_eq!(gesture.mode(), TouchMode::None);
    }

    #[test]
    fn pointer_down_during_pinch_keeps_anchor() {
        let mut transform = ViewTransform::new(1.0, 0.0, 0.0);
        let mut gesture = GestureController::new();

        let event = PointerEvent::pointer_down(p(100.0, 200.0), p(200.0, 200.0));
        touch(&mut gesture, &mut transform, event);
        let event = PointerEvent::moved(&[p(50.0, 200.0), p(250.0, 200.0)]);
        touch(&mut gesture, &mut transform, event);
        assert_approx_eq!(transform.scale(), 2.0);

        // Close pointers, then wide pointers, going down mid-pinch
        let event = PointerEvent::pointer_down(p(150.0, 200.0), p(155.0, 200.0));
        touch(&mut gesture, &mut transform, event);
        assert_eq!(gesture.mode(), TouchMode::Zoom);
        let event = PointerEvent::pointer_down(p(0.0, 200.0), p(50.0, 200.0));
        touch(&mut gesture, &mut transform, event);
        assert_approx_eq!(transform.scale(), 2.0);

        // Scale is still measured from the first pinch
        let event = PointerEvent::moved(&[p(0.0, 200.0), p(300.0, 200.0)]);
        assert!(touch(&mut gesture, &mut transform, event));
        assert_approx_eq!(transform.scale(), 3.0);
    }

    #[test]
    fn close_pointers_do_not_zoom() {
        let mut transform = ViewTransform::new(1.0, 0.0, 0.0);
        let mut gesture = GestureController::new();

        touch(&mut gesture, &mut transform, PointerEvent::down(p(100.0, 100.0)));
        let event = PointerEvent::pointer_down(p(100.0, 100.0), p(105.0, 100.0));
        touch(&mut gesture, &mut transform, event);
        assert_eq!(gesture.mode(), TouchMode::Drag);

        // Collapsing the pinch onto one point never drives the scale to zero
        let mut transform = ViewTransform::new(1.0, 0.0, 0.0);
        let mut gesture = GestureController::new();
        let event = PointerEvent::pointer_down(p(0.0, 0.0), p(100.0, 0.0));
        touch(&mut gesture, &mut transform, event);
        let event = PointerEvent::moved(&[p(50.0, 0.0), p(50.0, 0.0)]);
        assert!(!touch(&mut gesture, &mut transform, event));
        assert_eq!(transform.scale(), 1.0);
    }
}
