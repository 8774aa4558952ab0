//! The world to screen transform of the view.

use crate::math::Point2d;

/// The size of the view in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The centre of the viewport in screen coordinates.
    pub fn centre(&self) -> Point2d {
        Point2d::new(0.5 * self.width as f64, 0.5 * self.height as f64)
    }
}

/// Maps world coordinates to screen coordinates by `screen = (world + offset) * scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    scale: f64,
    x_offset: f64,
    y_offset: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            x_offset: 0.0,
            y_offset: 0.0,
        }
    }
}

impl ViewTransform {
    /// Creates a transform.
    ///
    /// # Panics
    /// Panics if `scale` is not positive.
    pub fn new(scale: f64, x_offset: f64, y_offset: f64) -> Self {
        assert!(is_valid_scale(scale), "invalid view scale {}", scale);
        Self {
            scale,
            x_offset,
            y_offset,
        }
    }

    /// Creates a transform, or `None` if `scale` is not a positive finite number.
    pub fn try_new(scale: f64, x_offset: f64, y_offset: f64) -> Option<Self> {
        is_valid_scale(scale).then(|| Self::new(scale, x_offset, y_offset))
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn x_offset(&self) -> f64 {
        self.x_offset
    }

    pub fn y_offset(&self) -> f64 {
        self.y_offset
    }

    /// Maps a point in world coordinates to screen coordinates.
    pub fn to_screen(&self, world: Point2d) -> Point2d {
        Point2d::new(
            (world.x + self.x_offset) * self.scale,
            (world.y + self.y_offset) * self.scale,
        )
    }

    /// Maps a point in screen coordinates to world coordinates.
    pub fn to_world(&self, screen: Point2d) -> Point2d {
        Point2d::new(
            screen.x / self.scale - self.x_offset,
            screen.y / self.scale - self.y_offset,
        )
    }

    pub fn set_offset(&mut self, x_offset: f64, y_offset: f64) {
        self.x_offset = x_offset;
        self.y_offset = y_offset;
    }

    /// Changes the scale, keeping the world point at the centre of the viewport fixed.
    ///
    /// Scales that are not positive and finite are ignored.
    /// Returns whether the transform changed.
    pub fn set_scale(&mut self, scale: f64, viewport: Viewport) -> bool {
        if !is_valid_scale(scale) || scale == self.scale {
            return false;
        }
        let delta = 1.0 / self.scale - 1.0 / scale;
        self.x_offset -= 0.5 * viewport.width as f64 * delta;
        self.y_offset -= 0.5 * viewport.height as f64 * delta;
        self.scale = scale;
        true
    }

    /// The world point at the centre of the viewport.
    pub fn center(&self, viewport: Viewport) -> Point2d {
        self.to_world(viewport.centre())
    }

    /// Moves the view so that `world` is at the centre of the viewport.
    pub fn set_center(&mut self, world: Point2d, viewport: Viewport) {
        let centre = viewport.centre();
        self.x_offset = centre.x / self.scale - world.x;
        self.y_offset = centre.y / self.scale - world.y;
    }

    /// Restores the transform to the given initial values.
    pub fn reset(&mut self, initial: ViewTransform) {
        *self = initial;
    }
}

fn is_valid_scale(scale: f64) -> bool {
    scale.is_finite() && scale > 0.0
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn screen_and_world_are_inverse() {
        let transform = ViewTransform::new(0.5, 10.0, -20.0);
        let world = Point2d::new(3.0, 4.0);
        let screen = transform.to_screen(world);
        assert_approx_eq!(screen.x, 6.5);
        assert_approx_eq!(screen.y, -8.0);
        let back = transform.to_world(screen);
        assert_approx_eq!(back.x, world.x);
        assert_approx_eq!(back.y, world.y);
    }

    #[test]
    fn zoom_keeps_centre_fixed() {
        let viewport = Viewport::new(800, 600);
        let mut transform = ViewTransform::new(0.707106781, 12.0, 34.0);
        let before = transform.center(viewport);
        for scale in [2.0, 0.1, 3.7] {
            assert!(transform.set_scale(scale, viewport));
            let after = transform.center(viewport);
            assert_approx_eq!(after.x, before.x, 1e-9);
            assert_approx_eq!(after.y, before.y, 1e-9);
        }
    }

    #[test]
    fn invalid_scales_are_rejected() {
        let viewport = Viewport::new(100, 100);
        let mut transform = ViewTransform::default();
        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(!transform.set_scale(scale, viewport));
        }
        assert_eq!(transform, ViewTransform::default());
    }

    #[test]
    fn try_new_rejects_invalid_scales() {
        assert!(ViewTransform::try_new(0.0, 1.0, 2.0).is_none());
        assert!(ViewTransform::try_new(f64::NAN, 1.0, 2.0).is_none());
        assert_eq!(
            ViewTransform::try_new(0.5, 1.0, 2.0),
            Some(ViewTransform::new(0.5, 1.0, 2.0))
        );
    }

    #[test]
    fn set_center() {
        let viewport = Viewport::new(200, 100);
        let mut transform = ViewTransform::new(2.0, 0.0, 0.0);
        transform.set_center(Point2d::new(50.0, -5.0), viewport);
        let screen = transform.to_screen(Point2d::new(50.0, -5.0));
        assert_approx_eq!(screen.x, 100.0);
        assert_approx_eq!(screen.y, 50.0);
    }
}
