//! Evo Viewer - windowed entry point
//!
//! Runs the frame loop on display refresh against the drift engine and
//! presents each frame through wgpu with an egui control strip.
//! Controls:
//!   Force generation button / T: complete the running generation after this frame
//!   H: Show or hide the generation history
//!   Escape: Quit

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use egui_wgpu::ScreenDescriptor;
use egui_winit::State as EguiWinitState;
use winit::{
    event::{ElementState, Event, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

use evo_viewer::core::error::{Result, ViewerError};
use evo_viewer::core::ViewerConfig;
use evo_viewer::engine::DriftEngine;
use evo_viewer::render::PixelCanvas;
use evo_viewer::renderer::{PresentError, Presenter};
use evo_viewer::simulation::{StatsLog, TracingSink, Viewer};
use evo_viewer::ui::{draw_panel, ControlPanel, PanelStatus};

type WindowViewer = Viewer<DriftEngine, (TracingSink, StatsLog)>;

/// Evo Viewer - watch a population evolve in real time
#[derive(Parser, Debug)]
#[command(name = "evo-viewer")]
#[command(about = "Real-time viewer for an evolving agent simulation")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for the engine
    #[arg(long)]
    seed: Option<u64>,

    /// Device pixels per logical point (defaults to the window scale factor)
    #[arg(long)]
    pixel_ratio: Option<f32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => ViewerConfig::from_file(path)?,
        None => ViewerConfig::default(),
    };
    if args.seed.is_some() {
        config.engine.seed = args.seed;
    }

    tracing::info!("Starting Evo Viewer");

    let event_loop = EventLoop::new()
        .map_err(|e| ViewerError::MissingCapability(format!("event loop: {e}")))?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Evo Viewer")
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.viewport.logical_width,
                config.viewport.logical_height,
            ))
            .with_resizable(false)
            .build(&event_loop)
            .map_err(|e| ViewerError::MissingCapability(format!("window: {e}")))?,
    );

    let pixel_ratio = args
        .pixel_ratio
        .or(config.viewport.pixel_ratio)
        .unwrap_or(window.scale_factor() as f32);

    let engine = DriftEngine::new(config.engine.clone());
    tracing::info!(seed = engine.seed(), "drift engine ready");

    let mut viewer: WindowViewer =
        Viewer::from_config(engine, &config, Some(pixel_ratio), (TracingSink, StatsLog::new()))?;
    let (width, height) = viewer.frame_loop().mapper().geometry().device_pixels();
    let mut canvas = PixelCanvas::new(width, height);

    let mut presenter = pollster::block_on(Presenter::new(window.clone()))?;

    let egui_ctx = egui::Context::default();
    let mut egui_winit_state = EguiWinitState::new(
        egui_ctx.clone(),
        egui::ViewportId::ROOT,
        &window,
        None,
        None,
    );
    let mut egui_renderer = egui_wgpu::Renderer::new(
        presenter.device(),
        presenter.surface_format(),
        None,
        1,
    );

    let mut panel = ControlPanel::new();
    let mut last_title_time = Instant::now();

    // The frame loop requests every redraw after this one
    window.request_redraw();

    event_loop
        .run(move |event, elwt| {
            let Event::WindowEvent { ref event, .. } = event else {
                return;
            };

            let egui_consumed = egui_winit_state.on_window_event(&window, event).consumed;

            if !egui_consumed {
                match event {
                    WindowEvent::CloseRequested => {
                        elwt.exit();
                    }

                    WindowEvent::Resized(size) => {
                        presenter.resize(size.width, size.height);
                    }

                    WindowEvent::KeyboardInput {
                        event: key_event, ..
                    } => {
                        if key_event.state == ElementState::Pressed && !key_event.repeat {
                            match key_event.physical_key {
                                PhysicalKey::Code(KeyCode::KeyT) => {
                                    panel.request_force();
                                }
                                PhysicalKey::Code(KeyCode::KeyH) => {
                                    panel.toggle_history();
                                }
                                PhysicalKey::Code(KeyCode::Escape) => {
                                    elwt.exit();
                                }
                                _ => {}
                            }
                        }
                    }

                    _ => {}
                }
            }

            let WindowEvent::RedrawRequested = event else {
                return;
            };

            if let Err(err) = viewer.frame(&mut canvas, &*window) {
                tracing::error!("Stopping: {}", err);
                elwt.exit();
                return;
            }

            let driver = viewer.driver();
            let status = PanelStatus {
                generation: driver.generation() + 1,
                ticks: driver.ticks(),
                ticks_in_generation: driver.ticks_in_generation(),
                fps: presenter.metrics().fps(),
            };

            let raw_input = egui_winit_state.take_egui_input(&window);
            egui_ctx.begin_frame(raw_input);
            draw_panel(&egui_ctx, &mut panel, status, &viewer.sink().1);
            let full_output = egui_ctx.end_frame();
            egui_winit_state.handle_platform_output(&window, full_output.platform_output);
            let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

            let (width, height) = presenter.size();
            let screen_descriptor = ScreenDescriptor {
                size_in_pixels: [width, height],
                pixels_per_point: full_output.pixels_per_point,
            };

            let result = presenter.present_with_overlay(&canvas, |device, queue, encoder, view| {
                for (id, image_delta) in &full_output.textures_delta.set {
                    egui_renderer.update_texture(device, queue, *id, image_delta);
                }

                egui_renderer.update_buffers(device, queue, encoder, &paint_jobs, &screen_descriptor);

                {
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("egui Render Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        timestamp_writes: None,
                        occlusion_query_set: None,
                    });
                    egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
                }

                for id in &full_output.textures_delta.free {
                    egui_renderer.free_texture(id);
                }
            });

            match result {
                Ok(()) => {}
                Err(PresentError::Surface(wgpu::SurfaceError::Lost)) => {
                    let (w, h) = presenter.size();
                    presenter.resize(w, h);
                }
                Err(PresentError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                    tracing::error!("Out of GPU memory!");
                    elwt.exit();
                }
                Err(e) => {
                    tracing::warn!("Render error: {}", e);
                }
            }

            // A click or T press lands between frames, after this one was presented
            if panel.take_force_request() && !force_generation(&mut viewer) {
                elwt.exit();
            }

            if last_title_time.elapsed().as_secs_f32() >= 1.0 {
                let driver = viewer.driver();
                window.set_title(&format!(
                    "Evo Viewer | generation {} | tick {} | {:.1} FPS",
                    driver.generation() + 1,
                    driver.ticks_in_generation(),
                    presenter.metrics().fps(),
                ));
                last_title_time = Instant::now();
            }
        })
        .map_err(|e| ViewerError::MissingCapability(format!("event loop: {e}")))
}

/// Fire the manual trigger; false when the engine faulted.
fn force_generation(viewer: &mut WindowViewer) -> bool {
    match viewer.force_generation() {
        Ok(_) => true,
        Err(err) => {
            tracing::error!("Stopping: {}", err);
            false
        }
    }
}
