use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use evo_viewer::core::config::EngineConfig;
use evo_viewer::engine::{DriftEngine, Engine};
use evo_viewer::render::{CoordinateMapper, DrawingContext, EntityRenderer, EntitySizes, PixelCanvas, ViewportGeometry};

fn bench_draw_world(c: &mut Criterion) {
    let mut group = c.benchmark_group("canvas_draw_world");

    for &(animals, foods) in &[(20_usize, 40_usize), (200, 400), (2000, 4000)] {
        let engine = DriftEngine::new(EngineConfig {
            animals,
            foods,
            seed: Some(0xBEEF),
            ..EngineConfig::default()
        });
        let world = engine.snapshot().clone();
        let geometry = ViewportGeometry::new(800.0, 800.0, 1.0);
        let mapper = CoordinateMapper::new(geometry);
        let (width, height) = geometry.device_pixels();

        group.bench_function(format!("agents{}_foods{}", animals, foods), |b| {
            b.iter_batched(
                || PixelCanvas::new(width, height),
                |mut canvas| {
                    canvas.clear_rect(0.0, 0.0, geometry.device_width(), geometry.device_height());
                    EntityRenderer::new(&mut canvas).draw_world(
                        black_box(&world),
                        &mapper,
                        EntitySizes::default(),
                    );
                    canvas
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_drift_tick(c: &mut Criterion) {
    c.bench_function("drift_tick_default", |b| {
        let mut engine = DriftEngine::new(EngineConfig {
            seed: Some(1),
            ..EngineConfig::default()
        });
        b.iter(|| black_box(engine.tick()));
    });
}

criterion_group!(benches, bench_draw_world, bench_drift_tick);
criterion_main!(benches);
