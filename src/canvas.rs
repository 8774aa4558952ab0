//! The drawing surface the painters draw onto.
//!
//! The host supplies a [Canvas] backed by whatever graphics API it has.
//! [DrawList] records commands instead of drawing them; the view keeps one
//! as its background raster and replays it every frame.

use crate::color::Color;
use crate::math::Point2d;
use crate::path::{Path, Rect};
use crate::transform::ViewTransform;

/// How a shape is painted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintStyle {
    Fill,
    Stroke,
    FillAndStroke,
}

/// A dash pattern for stroked lines, in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DashPattern {
    /// The length of each dash.
    pub on: f64,
    /// The length of each gap.
    pub off: f64,
}

/// The colour and style used to draw a shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub color: Color,
    pub style: PaintStyle,
    /// The stroke width in world units.
    pub stroke_width: f64,
    /// The dash pattern for strokes, or `None` for solid lines.
    pub dash: Option<DashPattern>,
    /// The text height in world units.
    pub text_size: f64,
}

impl Paint {
    /// A solid fill.
    pub fn fill(color: Color) -> Self {
        Self {
            color,
            style: PaintStyle::Fill,
            stroke_width: 0.0,
            dash: None,
            text_size: DEFAULT_TEXT_SIZE,
        }
    }

    /// A solid stroke of the given width.
    pub fn stroke(color: Color, stroke_width: f64) -> Self {
        Self {
            color,
            style: PaintStyle::Stroke,
            stroke_width,
            dash: None,
            text_size: DEFAULT_TEXT_SIZE,
        }
    }

    pub fn with_style(mut self, style: PaintStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_dash(mut self, dash: Option<DashPattern>) -> Self {
        self.dash = dash;
        self
    }

    pub fn with_text_size(mut self, text_size: f64) -> Self {
        self.text_size = text_size;
        self
    }
}

/// The default text height in world units.
pub const DEFAULT_TEXT_SIZE: f64 = 12.0;

/// A surface that can be drawn on.
///
/// Coordinates passed to the drawing methods are world coordinates,
/// mapped to the screen by the most recent [Canvas::set_transform].
pub trait Canvas {
    /// Fills the whole surface, ignoring the transform.
    fn clear(&mut self, color: Color);

    /// Sets the world to screen transform for subsequent drawing.
    fn set_transform(&mut self, transform: &ViewTransform);

    fn draw_path(&mut self, path: &Path, paint: &Paint);

    fn draw_circle(&mut self, centre: Point2d, radius: f64, paint: &Paint);

    fn draw_rect(&mut self, rect: Rect, paint: &Paint);

    fn draw_text(&mut self, text: &str, pos: Point2d, paint: &Paint);

    /// Copies a previously recorded raster onto the surface.
    ///
    /// Backends with their own offscreen buffers will want to override this;
    /// the default replays the recorded commands.
    fn draw_raster(&mut self, raster: &DrawList) {
        raster.replay(self);
    }
}

/// A single recorded drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    SetTransform(ViewTransform),
    Path {
        path: Path,
        paint: Paint,
    },
    Circle {
        centre: Point2d,
        radius: f64,
        paint: Paint,
    },
    Rect {
        rect: Rect,
        paint: Paint,
    },
    Text {
        text: String,
        pos: Point2d,
        paint: Paint,
    },
    /// A raster of the given number of commands was copied onto the surface.
    Raster {
        commands: usize,
    },
}

/// A canvas that records the commands drawn on it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Default::default()
    }

    /// The recorded commands, in the order they were drawn.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Removes all recorded commands, keeping the allocated storage.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Draws the recorded commands onto another canvas.
    pub fn replay<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::SetTransform(transform) => canvas.set_transform(transform),
                DrawCommand::Path { path, paint } => canvas.draw_path(path, paint),
                DrawCommand::Circle {
                    centre,
                    radius,
                    paint,
                } => canvas.draw_circle(*centre, *radius, paint),
                DrawCommand::Rect { rect, paint } => canvas.draw_rect(*rect, paint),
                DrawCommand::Text { text, pos, paint } => canvas.draw_text(text, *pos, paint),
                // A nested raster was flattened when it was recorded.
                DrawCommand::Raster { .. } => {}
            }
        }
    }
}

impl Canvas for DrawList {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn set_transform(&mut self, transform: &ViewTransform) {
        self.commands.push(DrawCommand::SetTransform(*transform));
    }

    fn draw_path(&mut self, path: &Path, paint: &Paint) {
        self.commands.push(DrawCommand::Path {
            path: path.clone(),
            paint: *paint,
        });
    }

    fn draw_circle(&mut self, centre: Point2d, radius: f64, paint: &Paint) {
        self.commands.push(DrawCommand::Circle {
            centre,
            radius,
            paint: *paint,
        });
    }

    fn draw_rect(&mut self, rect: Rect, paint: &Paint) {
        self.commands.push(DrawCommand::Rect { rect, paint: *paint });
    }

    fn draw_text(&mut self, text: &str, pos: Point2d, paint: &Paint) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            pos,
            paint: *paint,
        });
    }

    fn draw_raster(&mut self, raster: &DrawList) {
        self.commands.push(DrawCommand::Raster {
            commands: raster.len(),
        });
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn records_in_order() {
        let mut list = DrawList::new();
        list.clear(Color::BLACK);
        list.draw_circle(Point2d::new(1.0, 2.0), 3.0, &Paint::fill(Color::RED));
        list.draw_text("42", Point2d::new(0.0, 0.0), &Paint::fill(Color::WHITE));
        assert!(matches!(list.commands()[0], DrawCommand::Clear(Color::BLACK)));
        assert!(matches!(list.commands()[1], DrawCommand::Circle { radius, .. } if radius == 3.0));
        assert!(matches!(&list.commands()[2], DrawCommand::Text { text, .. } if text == "42"));
    }

    #[test]
    fn replay_reproduces_commands() {
        let mut list = DrawList::new();
        list.clear(Color::WHITE);
        list.set_transform(&ViewTransform::new(2.0, 1.0, -1.0));
        list.draw_rect(
            Rect::new(0.0, 0.0, 1.0, 1.0),
            &Paint::stroke(Color::RED, 0.5),
        );

        let mut copy = DrawList::new();
        list.replay(&mut copy);
        assert_eq!(copy, list);
    }

    #[test]
    fn raster_is_recorded_as_one_command() {
        let mut raster = DrawList::new();
        raster.clear(Color::WHITE);
        raster.draw_circle(Point2d::new(0.0, 0.0), 1.0, &Paint::fill(Color::RED));

        let mut target = DrawList::new();
        target.draw_raster(&raster);
        assert_eq!(target.commands(), &[DrawCommand::Raster { commands: 2 }]);
    }
}
