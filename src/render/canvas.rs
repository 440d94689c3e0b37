//! CPU drawing surface backed by an RGBA image.
//!
//! Fills use the nonzero winding rule sampled at pixel centers; strokes
//! are one pixel wide. Geometry is not antialiased. Calls carrying a
//! non-finite coordinate are ignored, and anything outside the image is
//! clipped.

use std::f32::consts::TAU;
use std::path::Path;

use glam::Vec2;
use image::{Rgba, RgbaImage};

use super::colors::{Color, STROKE};
use super::surface::DrawingContext;
use crate::core::error::Result;

/// Upper bound on samples along one stroked segment
const MAX_STROKE_STEPS: usize = 1 << 14;

/// Arc flattening: segments per pixel of arc length, with bounds
const ARC_SEGMENTS_PER_PIXEL: f32 = 0.5;
const ARC_MIN_SEGMENTS: usize = 8;
const ARC_MAX_SEGMENTS: usize = 256;

#[derive(Debug, Clone, Default)]
struct Subpath {
    points: Vec<Vec2>,
    closed: bool,
}

pub struct PixelCanvas {
    image: RgbaImage,
    subpaths: Vec<Subpath>,
    stroke_color: Color,
    // Reused per scanline
    crossings: Vec<(f32, i32)>,
}

impl PixelCanvas {
    /// Create a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width.max(1), height.max(1)),
            subpaths: Vec::new(),
            stroke_color: STROKE,
            crossings: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Raw RGBA8 bytes, row-major from the top-left.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.width() && y < self.height() {
            Some(self.image.get_pixel(x, y).0)
        } else {
            None
        }
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    fn current(&mut self) -> Option<&mut Subpath> {
        self.subpaths.last_mut().filter(|s| !s.points.is_empty())
    }

    fn start_subpath(&mut self, point: Vec2) {
        self.subpaths.push(Subpath {
            points: vec![point],
            closed: false,
        });
    }

    fn push_point(&mut self, point: Vec2) {
        if let Some(subpath) = self.current() {
            subpath.points.push(point);
            return;
        }
        self.start_subpath(point);
    }

    fn blend_pixel(&mut self, x: i64, y: i64, src: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        *dst = source_over(*dst, src);
    }

    fn fill_span(&mut self, row: u32, x0: f32, x1: f32, src: [u8; 4]) {
        // Pixel centers in [x0, x1)
        let start = (x0 - 0.5).ceil().max(0.0);
        let end = (x1 - 0.5).ceil().min(self.width() as f32);
        if !(start < end) {
            return;
        }
        for x in start as u32..end as u32 {
            let dst = self.image.get_pixel_mut(x, row);
            *dst = source_over(*dst, src);
        }
    }

    fn draw_segment(&mut self, a: Vec2, b: Vec2, src: [u8; 4]) {
        let delta = b - a;
        let steps = (delta.x.abs().max(delta.y.abs()).ceil() as usize).clamp(1, MAX_STROKE_STEPS);
        for i in 0..=steps {
            let p = a + delta * (i as f32 / steps as f32);
            self.blend_pixel(p.x.floor() as i64, p.y.floor() as i64, src);
        }
    }
}

impl DrawingContext for PixelCanvas {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if ![x, y, width, height].iter().all(|v| v.is_finite()) {
            return;
        }
        let (x0, x1) = (x.min(x + width), x.max(x + width));
        let (y0, y1) = (y.min(y + height), y.max(y + height));

        let x0 = x0.floor().max(0.0) as u32;
        let y0 = y0.floor().max(0.0) as u32;
        let x1 = (x1.ceil().max(0.0) as u32).min(self.width());
        let y1 = (y1.ceil().max(0.0) as u32).min(self.height());

        let clear = Rgba(Color::TRANSPARENT.to_rgba8());
        for row in y0..y1 {
            for col in x0..x1 {
                self.image.put_pixel(col, row, clear);
            }
        }
    }

    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        self.start_subpath(Vec2::new(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        self.push_point(Vec2::new(x, y));
    }

    fn close_path(&mut self) {
        let Some(subpath) = self.current() else {
            return;
        };
        subpath.closed = true;
        let first = subpath.points[0];
        self.start_subpath(first);
    }

    fn arc(&mut self, cx: f32, cy: f32, radius: f32, start_angle: f32, end_angle: f32) {
        if ![cx, cy, radius, start_angle, end_angle]
            .iter()
            .all(|v| v.is_finite())
        {
            return;
        }

        let raw = end_angle - start_angle;
        let sweep = if raw >= TAU { TAU } else { raw.rem_euclid(TAU) };
        let segments = ((sweep * radius.abs() * ARC_SEGMENTS_PER_PIXEL).ceil() as usize)
            .clamp(ARC_MIN_SEGMENTS, ARC_MAX_SEGMENTS);

        let center = Vec2::new(cx, cy);
        for i in 0..=segments {
            let angle = start_angle + sweep * (i as f32 / segments as f32);
            self.push_point(center + Vec2::new(angle.cos(), angle.sin()) * radius);
        }
    }

    fn stroke(&mut self) {
        let src = self.stroke_color.to_rgba8();
        let subpaths = std::mem::take(&mut self.subpaths);
        for subpath in &subpaths {
            for pair in subpath.points.windows(2) {
                self.draw_segment(pair[0], pair[1], src);
            }
            if subpath.closed && subpath.points.len() > 1 {
                let last = subpath.points[subpath.points.len() - 1];
                self.draw_segment(last, subpath.points[0], src);
            }
        }
        self.subpaths = subpaths;
    }

    fn fill(&mut self, color: Color) {
        let src = color.to_rgba8();

        // Every subpath is implicitly closed for filling
        let mut edges = Vec::new();
        for subpath in self.subpaths.iter().filter(|s| s.points.len() > 2) {
            let points = &subpath.points;
            for i in 0..points.len() {
                edges.push((points[i], points[(i + 1) % points.len()]));
            }
        }
        if edges.is_empty() {
            return;
        }

        let (min_y, max_y) = edges.iter().fold((f32::MAX, f32::MIN), |(lo, hi), (a, b)| {
            (lo.min(a.y).min(b.y), hi.max(a.y).max(b.y))
        });
        let first_row = min_y.floor().max(0.0) as u32;
        let last_row = (max_y.ceil().max(0.0) as u32).min(self.height());

        let mut crossings = std::mem::take(&mut self.crossings);
        for row in first_row..last_row {
            let sample_y = row as f32 + 0.5;

            crossings.clear();
            for (a, b) in &edges {
                if a.y == b.y {
                    continue;
                }
                let (lo, hi) = if a.y < b.y { (a.y, b.y) } else { (b.y, a.y) };
                if sample_y < lo || sample_y >= hi {
                    continue;
                }
                let x = a.x + (sample_y - a.y) * (b.x - a.x) / (b.y - a.y);
                let direction = if b.y > a.y { 1 } else { -1 };
                crossings.push((x, direction));
            }
            crossings.sort_by(|l, r| l.0.total_cmp(&r.0));

            let mut winding = 0;
            for i in 0..crossings.len().saturating_sub(1) {
                winding += crossings[i].1;
                if winding != 0 {
                    self.fill_span(row, crossings[i].0, crossings[i + 1].0, src);
                }
            }
        }
        self.crossings = crossings;
    }
}

/// Straight-alpha source-over compositing.
fn source_over(dst: Rgba<u8>, src: [u8; 4]) -> Rgba<u8> {
    match src[3] {
        255 => return Rgba(src),
        0 => return dst,
        _ => {}
    }

    let sa = src[3] as f32 / 255.0;
    let da = dst.0[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    let mut out = [0u8; 4];
    for c in 0..3 {
        let value = (src[c] as f32 * sa + dst.0[c] as f32 * da * (1.0 - sa)) / out_a;
        out[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round() as u8;
    Rgba(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::colors::{AGENT, FOOD};
    use crate::render::entities::EntityRenderer;

    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    fn square(canvas: &mut PixelCanvas, x: f32, y: f32, side: f32) {
        canvas.move_to(x, y);
        canvas.line_to(x + side, y);
        canvas.line_to(x + side, y + side);
        canvas.line_to(x, y + side);
        canvas.close_path();
    }

    #[test]
    fn test_new_canvas_is_transparent() {
        let canvas = PixelCanvas::new(4, 3);
        assert_eq!(canvas.size(), (4, 3));
        assert!(canvas.as_raw().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fill_square_covers_pixel_centers() {
        let mut canvas = PixelCanvas::new(10, 10);
        canvas.begin_path();
        square(&mut canvas, 2.0, 2.0, 4.0);
        canvas.fill(Color::WHITE);

        assert_eq!(canvas.pixel(2, 2), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(5, 5), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(6, 6), Some(CLEAR));
        assert_eq!(canvas.pixel(1, 3), Some(CLEAR));
    }

    #[test]
    fn test_nonzero_winding_fills_overlap() {
        let mut canvas = PixelCanvas::new(20, 20);
        canvas.begin_path();
        square(&mut canvas, 2.0, 2.0, 10.0);
        square(&mut canvas, 6.0, 6.0, 10.0);
        canvas.fill(Color::WHITE);

        // Same orientation twice, so the overlap stays filled
        assert_eq!(canvas.pixel(8, 8), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(14, 14), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_clear_rect_resets_pixels() {
        let mut canvas = PixelCanvas::new(8, 8);
        canvas.begin_path();
        square(&mut canvas, 0.0, 0.0, 8.0);
        canvas.fill(Color::WHITE);

        canvas.clear_rect(0.0, 0.0, 4.0, 8.0);
        assert_eq!(canvas.pixel(3, 3), Some(CLEAR));
        assert_eq!(canvas.pixel(4, 3), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_stroke_outlines_in_black() {
        let mut canvas = PixelCanvas::new(10, 10);
        canvas.begin_path();
        canvas.move_to(1.0, 5.0);
        canvas.line_to(8.0, 5.0);
        canvas.stroke();

        assert_eq!(canvas.pixel(4, 5), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(4, 4), Some(CLEAR));
    }

    #[test]
    fn test_food_marker_is_green_at_center() {
        let mut canvas = PixelCanvas::new(100, 100);
        EntityRenderer::new(&mut canvas).draw_food(50.0, 50.0, 5.0);

        assert_eq!(canvas.pixel(50, 50), Some(FOOD.to_rgba8()));
        assert_eq!(canvas.pixel(52, 51), Some(FOOD.to_rgba8()));
        assert_eq!(canvas.pixel(57, 50), Some(CLEAR));
    }

    #[test]
    fn test_agent_marker_is_white_toward_nose() {
        let mut canvas = PixelCanvas::new(100, 100);
        EntityRenderer::new(&mut canvas).draw_agent(25.0, 25.0, 8.0, 0.0);

        // Inside the triangle, between center and nose
        assert_eq!(canvas.pixel(29, 25), Some(AGENT.to_rgba8()));
        // Behind the base edge (x = 21) is empty
        assert_eq!(canvas.pixel(18, 25), Some(CLEAR));
    }

    #[test]
    fn test_garbage_geometry_does_not_panic() {
        let mut canvas = PixelCanvas::new(16, 16);
        let mut renderer = EntityRenderer::new(&mut canvas);
        renderer.draw_agent(f32::NAN, 4.0, 3.0, 0.0);
        renderer.draw_agent(4.0, 4.0, 2.0, f32::NAN);
        renderer.draw_food(-1.0e9, 1.0e9, 5.0);
        renderer.draw_food(8.0, 8.0, -3.0);
        renderer.draw_agent(1.0e12, -1.0e12, 1.0e6, 1.0);
        assert_eq!(canvas.size(), (16, 16));
    }

    #[test]
    fn test_translucent_fill_blends() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.begin_path();
        square(&mut canvas, 0.0, 0.0, 4.0);
        canvas.fill(Color::WHITE);
        canvas.begin_path();
        square(&mut canvas, 0.0, 0.0, 4.0);
        canvas.fill(Color::rgba(0.0, 0.0, 0.0, 0.5));

        let [r, g, b, a] = canvas.pixel(1, 1).unwrap();
        assert_eq!(a, 255);
        assert!(r > 120 && r < 135 && r == g && g == b);
    }
}
