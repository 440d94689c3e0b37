//! Integration tests for mapping and entity drawing
//!
//! These tests drive the public rendering API end to end:
//! - Normalized positions land on the expected device pixels
//! - Food and agent markers keep their geometry through the mapper
//! - The CPU canvas paints the fixed entity colors
//! - Mapper linearity and ordering hold for arbitrary geometries

use proptest::prelude::*;

use evo_viewer::engine::{Animal, Food, WorldSnapshot};
use evo_viewer::render::colors::{AGENT, FOOD};
use evo_viewer::render::entities::agent_vertices;
use evo_viewer::render::{
    CoordinateMapper, DrawCommand, EntityRenderer, EntitySizes, PixelCanvas, RecordingContext,
    ViewportGeometry,
};

const CLEAR: [u8; 4] = [0, 0, 0, 0];

fn scenario_world() -> WorldSnapshot {
    WorldSnapshot::new(vec![Food::new(0.5, 0.5)], vec![Animal::new(0.25, 0.25, 0.0)])
}

#[test]
fn test_end_to_end_marker_geometry() {
    let mapper = CoordinateMapper::new(ViewportGeometry::new(100.0, 100.0, 1.0));
    let sizes = EntitySizes::default();
    let mut ctx = RecordingContext::new();

    EntityRenderer::new(&mut ctx).draw_world(&scenario_world(), &mapper, sizes);

    let commands = ctx.commands();
    let arc = commands
        .iter()
        .find_map(|c| match c {
            DrawCommand::Arc { cx, cy, radius, .. } => Some((*cx, *cy, *radius)),
            _ => None,
        })
        .expect("food arc");
    assert_eq!((arc.0, arc.1), (50.0, 50.0));
    assert!((arc.2 - 0.5).abs() < 1e-6);

    let nose = commands
        .iter()
        .find_map(|c| match c {
            DrawCommand::MoveTo { x, y } => Some((*x, *y)),
            _ => None,
        })
        .expect("agent path");
    let size = mapper.to_device_size(sizes.agent_size);
    assert!((nose.0 - (25.0 + 1.5 * size)).abs() < 1e-4);
    assert!((nose.1 - 25.0).abs() < 1e-4);
}

#[test]
fn test_canvas_paints_entity_colors() {
    let mapper = CoordinateMapper::new(ViewportGeometry::new(100.0, 100.0, 1.0));
    let sizes = EntitySizes {
        food_radius: 0.05,
        agent_size: 0.05,
    };
    let mut canvas = PixelCanvas::new(100, 100);

    EntityRenderer::new(&mut canvas).draw_world(&scenario_world(), &mapper, sizes);

    assert_eq!(canvas.pixel(50, 50), Some(FOOD.to_rgba8()));
    assert_eq!(canvas.pixel(25, 25), Some(AGENT.to_rgba8()));
    assert_eq!(canvas.pixel(5, 90), Some(CLEAR));
}

#[test]
fn test_pixel_ratio_scales_markers() {
    let mapper = CoordinateMapper::new(ViewportGeometry::new(100.0, 100.0, 2.0));
    let mut ctx = RecordingContext::new();

    EntityRenderer::new(&mut ctx).draw_world(&scenario_world(), &mapper, EntitySizes::default());

    assert!(ctx.commands().iter().any(|c| matches!(
        c,
        DrawCommand::Arc { cx, cy, radius, .. }
            if *cx == 100.0 && *cy == 100.0 && (*radius - 1.0).abs() < 1e-6
    )));
}

#[test]
fn test_out_of_range_entities_are_clipped() {
    let mapper = CoordinateMapper::new(ViewportGeometry::new(40.0, 40.0, 1.0));
    let world = WorldSnapshot::new(
        vec![Food::new(-0.5, 2.0), Food::new(f32::NAN, 0.5)],
        vec![Animal::new(1.5, -1.0, f32::INFINITY)],
    );
    let mut canvas = PixelCanvas::new(40, 40);

    EntityRenderer::new(&mut canvas).draw_world(&world, &mapper, EntitySizes::default());

    assert!(canvas.as_raw().iter().all(|&byte| byte == 0));
}

#[test]
fn test_mapper_corners_are_exact() {
    let mapper = CoordinateMapper::new(ViewportGeometry::new(800.0, 600.0, 2.0));
    let origin = mapper.to_device(0.0, 0.0);
    let corner = mapper.to_device(1.0, 1.0);
    assert_eq!((origin.x, origin.y), (0.0, 0.0));
    assert_eq!((corner.x, corner.y), (1600.0, 1200.0));
}

proptest! {
    #[test]
    fn prop_mapper_preserves_order(
        width in 1.0f32..4096.0,
        height in 1.0f32..4096.0,
        ratio in 0.5f32..4.0,
        a in 0.0f32..1.0,
        b in 0.0f32..1.0,
    ) {
        let mapper = CoordinateMapper::new(ViewportGeometry::new(width, height, ratio));
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let p = mapper.to_device(lo, lo);
        let q = mapper.to_device(hi, hi);
        if hi - lo > 1e-5 {
            prop_assert!(p.x < q.x);
            prop_assert!(p.y < q.y);
        } else {
            prop_assert!(p.x <= q.x);
            prop_assert!(p.y <= q.y);
        }
    }

    #[test]
    fn prop_mapper_is_linear(
        width in 1.0f32..2048.0,
        ratio in 0.5f32..4.0,
        a in 0.0f32..1.0,
        b in 0.0f32..1.0,
    ) {
        let mapper = CoordinateMapper::new(ViewportGeometry::new(width, width, ratio));
        let sum = mapper.to_device(a + b, 0.0).x;
        let parts = mapper.to_device(a, 0.0).x + mapper.to_device(b, 0.0).x;
        prop_assert!((sum - parts).abs() <= 1e-3 * width * ratio);
    }

    #[test]
    fn prop_agent_nose_is_farthest_vertex(
        size in 0.1f32..50.0,
        rotation in -10.0f32..10.0,
    ) {
        let [nose, left, right] = agent_vertices(0.0, 0.0, size, rotation);
        prop_assert!((nose.length() - 1.5 * size).abs() < 1e-3 * size.max(1.0));
        prop_assert!(nose.length() > left.length());
        prop_assert!(nose.length() > right.length());
    }
}
