//! Drawing surface boundary.
//!
//! A small immediate-mode 2D path API in device pixels, shaped after the
//! HTML canvas context: build a path, then stroke and/or fill it.

use super::colors::Color;

/// 2D path drawing primitives, in device pixel coordinates.
pub trait DrawingContext {
    /// Wipe a rectangle back to transparent.
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Discard the current path and start a new one.
    fn begin_path(&mut self);

    /// Start a new subpath at the given point.
    fn move_to(&mut self, x: f32, y: f32);

    /// Extend the current subpath with a straight segment.
    fn line_to(&mut self, x: f32, y: f32);

    /// Close the current subpath back to its first point.
    fn close_path(&mut self);

    /// Append a circular arc, clockwise in screen space from `start_angle`
    /// to `end_angle` (radians, 0 along +x).
    fn arc(&mut self, cx: f32, cy: f32, radius: f32, start_angle: f32, end_angle: f32);

    /// Outline the current path.
    fn stroke(&mut self);

    /// Fill the current path with a solid color.
    fn fill(&mut self, color: Color);
}

impl<C: DrawingContext + ?Sized> DrawingContext for &mut C {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        (**self).clear_rect(x, y, width, height)
    }

    fn begin_path(&mut self) {
        (**self).begin_path()
    }

    fn move_to(&mut self, x: f32, y: f32) {
        (**self).move_to(x, y)
    }

    fn line_to(&mut self, x: f32, y: f32) {
        (**self).line_to(x, y)
    }

    fn close_path(&mut self) {
        (**self).close_path()
    }

    fn arc(&mut self, cx: f32, cy: f32, radius: f32, start_angle: f32, end_angle: f32) {
        (**self).arc(cx, cy, radius, start_angle, end_angle)
    }

    fn stroke(&mut self) {
        (**self).stroke()
    }

    fn fill(&mut self, color: Color) {
        (**self).fill(color)
    }
}

/// One recorded drawing call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    ClearRect { x: f32, y: f32, width: f32, height: f32 },
    BeginPath,
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    ClosePath,
    Arc { cx: f32, cy: f32, radius: f32, start_angle: f32, end_angle: f32 },
    Stroke,
    Fill(Color),
}

/// Context that draws nothing and remembers every call.
#[derive(Debug, Default, Clone)]
pub struct RecordingContext {
    commands: Vec<DrawCommand>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of `Fill` calls recorded.
    pub fn fill_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Fill(_)))
            .count()
    }
}

impl DrawingContext for RecordingContext {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.commands.push(DrawCommand::ClearRect { x, y, width, height });
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::LineTo { x, y });
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn arc(&mut self, cx: f32, cy: f32, radius: f32, start_angle: f32, end_angle: f32) {
        self.commands.push(DrawCommand::Arc {
            cx,
            cy,
            radius,
            start_angle,
            end_angle,
        });
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn fill(&mut self, color: Color) {
        self.commands.push(DrawCommand::Fill(color));
    }
}
