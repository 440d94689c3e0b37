//! Normalized world to device-space mapping
//!
//! The world is the unit square. The surface is `logical * pixel_ratio`
//! device pixels wide and tall, origin top-left. Nothing is clamped: a
//! point outside the unit square lands outside the surface.

use glam::Vec2;

/// Surface dimensions, fixed at startup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    pub logical_width: f32,
    pub logical_height: f32,
    pub pixel_ratio: f32,
}

impl ViewportGeometry {
    pub const fn new(logical_width: f32, logical_height: f32, pixel_ratio: f32) -> Self {
        Self {
            logical_width,
            logical_height,
            pixel_ratio,
        }
    }

    /// Geometry with host-provided pixel ratio, defaulting to 1.0
    pub fn with_optional_ratio(logical_width: f32, logical_height: f32, ratio: Option<f32>) -> Self {
        Self::new(logical_width, logical_height, ratio.unwrap_or(1.0))
    }

    pub fn device_width(&self) -> f32 {
        self.logical_width * self.pixel_ratio
    }

    pub fn device_height(&self) -> f32 {
        self.logical_height * self.pixel_ratio
    }

    /// Device size rounded to whole pixels, at least 1x1
    pub fn device_pixels(&self) -> (u32, u32) {
        (
            (self.device_width().round() as u32).max(1),
            (self.device_height().round() as u32).max(1),
        )
    }
}

/// Pure world-to-device transform for one viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    geometry: ViewportGeometry,
}

impl CoordinateMapper {
    pub const fn new(geometry: ViewportGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> ViewportGeometry {
        self.geometry
    }

    /// Convert a normalized point to device pixels
    pub fn to_device(&self, nx: f32, ny: f32) -> Vec2 {
        Vec2::new(
            nx * self.geometry.device_width(),
            ny * self.geometry.device_height(),
        )
    }

    /// Convert a size fraction to device pixels
    ///
    /// Sizes always scale with the width so markers stay round on
    /// non-square surfaces.
    pub fn to_device_size(&self, fraction: f32) -> f32 {
        fraction * self.geometry.device_width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_size_scales_with_ratio() {
        let geometry = ViewportGeometry::new(400.0, 300.0, 2.0);
        assert_eq!(geometry.device_width(), 800.0);
        assert_eq!(geometry.device_height(), 600.0);
        assert_eq!(geometry.device_pixels(), (800, 600));
    }

    #[test]
    fn test_missing_ratio_defaults_to_one() {
        let geometry = ViewportGeometry::with_optional_ratio(640.0, 480.0, None);
        assert_eq!(geometry.pixel_ratio, 1.0);
    }

    #[test]
    fn test_corners_map_exactly() {
        let mapper = CoordinateMapper::new(ViewportGeometry::new(640.0, 480.0, 1.5));
        assert_eq!(mapper.to_device(0.0, 0.0), Vec2::ZERO);
        assert_eq!(mapper.to_device(1.0, 1.0), Vec2::new(960.0, 720.0));
    }

    #[test]
    fn test_out_of_range_is_not_clamped() {
        let mapper = CoordinateMapper::new(ViewportGeometry::new(100.0, 100.0, 1.0));
        assert_eq!(mapper.to_device(-0.5, 1.5), Vec2::new(-50.0, 150.0));
    }

    #[test]
    fn test_size_uses_width() {
        let mapper = CoordinateMapper::new(ViewportGeometry::new(200.0, 100.0, 1.0));
        assert!((mapper.to_device_size(0.01) - 2.0).abs() < 1e-6);
    }
}
