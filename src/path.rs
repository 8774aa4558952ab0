//! Drawable paths.

use crate::math::Point2d;
use smallvec::SmallVec;

/// An axis-aligned rectangle, with `top < bottom` when the y-axis points down the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    /// Creates a rectangle from its four edges.
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a square centred on `centre` with the given half side length.
    pub fn around(centre: Point2d, half_size: f64) -> Self {
        Self::new(
            centre.x - half_size,
            centre.y - half_size,
            centre.x + half_size,
            centre.y + half_size,
        )
    }

    pub fn centre(&self) -> Point2d {
        Point2d::new(
            0.5 * (self.left + self.right),
            0.5 * (self.top + self.bottom),
        )
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// The direction in which a closed contour is traced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Cw,
    Ccw,
}

/// A single drawing command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point2d),
    LineTo(Point2d),
    QuadTo {
        control: Point2d,
        end: Point2d,
    },
    /// Starts a new contour along the ellipse inscribed in `oval`.
    /// Angles are in degrees, measured from the positive x-axis towards the positive y-axis.
    AddArc {
        oval: Rect,
        start_angle: f64,
        sweep_angle: f64,
    },
    /// Adds a closed circular contour.
    AddCircle {
        centre: Point2d,
        radius: f64,
        direction: Direction,
    },
    Close,
}

impl PathCommand {
    /// The point at which this command leaves the pen, if it is a single point.
    pub fn end_point(&self) -> Option<Point2d> {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(p),
            PathCommand::QuadTo { end, .. } => Some(end),
            PathCommand::AddArc {
                oval,
                start_angle,
                sweep_angle,
            } => Some(point_on_oval(&oval, start_angle + sweep_angle)),
            PathCommand::AddCircle { .. } | PathCommand::Close => None,
        }
    }

    /// The point at which this command starts drawing, for commands that
    /// begin a new contour.
    fn contour_start(&self) -> Option<Point2d> {
        match *self {
            PathCommand::MoveTo(p) => Some(p),
            PathCommand::AddArc {
                oval, start_angle, ..
            } => Some(point_on_oval(&oval, start_angle)),
            _ => None,
        }
    }
}

/// Gets the point on the ellipse inscribed in `oval` at `angle` degrees.
pub fn point_on_oval(oval: &Rect, angle: f64) -> Point2d {
    let centre = oval.centre();
    let angle = angle.to_radians();
    Point2d::new(
        centre.x + 0.5 * oval.width() * angle.cos(),
        centre.y + 0.5 * oval.height() * angle.sin(),
    )
}

/// An ordered sequence of drawing commands.
///
/// Paths are cleared and rebuilt rather than reallocated,
/// so painters keep one around per purpose.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: SmallVec<[PathCommand; 8]>,
}

impl Path {
    /// Creates an empty path.
    pub fn new() -> Self {
        Default::default()
    }

    /// Removes all commands, keeping the allocated storage.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The commands in the path.
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn move_to(&mut self, p: Point2d) {
        self.commands.push(PathCommand::MoveTo(p));
    }

    pub fn line_to(&mut self, p: Point2d) {
        self.commands.push(PathCommand::LineTo(p));
    }

    pub fn quad_to(&mut self, control: Point2d, end: Point2d) {
        self.commands.push(PathCommand::QuadTo { control, end });
    }

    pub fn add_arc(&mut self, oval: Rect, start_angle: f64, sweep_angle: f64) {
        self.commands.push(PathCommand::AddArc {
            oval,
            start_angle,
            sweep_angle,
        });
    }

    pub fn add_circle(&mut self, centre: Point2d, radius: f64, direction: Direction) {
        self.commands.push(PathCommand::AddCircle {
            centre,
            radius,
            direction,
        });
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }

    /// Adds a closed polygon through the given points.
    pub fn add_polygon(&mut self, points: &[Point2d]) {
        if let Some((first, rest)) = points.split_first() {
            self.move_to(*first);
            for p in rest {
                self.line_to(*p);
            }
            self.close();
        }
    }

    /// The point where the first contour starts.
    pub fn start_point(&self) -> Option<Point2d> {
        self.commands.first().and_then(PathCommand::contour_start)
    }

    /// The point where the pen rests after the last command.
    pub fn end_point(&self) -> Option<Point2d> {
        self.commands.last().and_then(PathCommand::end_point)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn clear_keeps_path_reusable() {
        let mut path = Path::new();
        path.move_to(Point2d::new(0.0, 0.0));
        path.line_to(Point2d::new(1.0, 2.0));
        assert_eq!(path.end_point(), Some(Point2d::new(1.0, 2.0)));

        path.clear();
        assert!(path.is_empty());
        assert_eq!(path.start_point(), None);
    }

    #[test]
    fn arc_end_points() {
        let mut path = Path::new();
        path.add_arc(Rect::new(-10.0, -10.0, 10.0, 10.0), 90.0, 180.0);
        let start = path.start_point().unwrap();
        let end = path.end_point().unwrap();
        assert_approx_eq!(start.x, 0.0);
        assert_approx_eq!(start.y, 10.0);
        assert_approx_eq!(end.x, 0.0);
        assert_approx_eq!(end.y, -10.0);
    }

    #[test]
    fn polygon_is_closed() {
        let mut path = Path::new();
        path.add_polygon(&[
            Point2d::new(0.0, 0.0),
            Point2d::new(1.0, 0.0),
            Point2d::new(1.0, 1.0),
        ]);
        assert_eq!(path.commands().len(), 4);
        assert_eq!(path.commands()[3], PathCommand::Close);
    }
}
