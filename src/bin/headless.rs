//! Headless runner
//!
//! Runs the frame loop against the CPU canvas without a window, then
//! writes the last frame as a PNG and the last world snapshot as JSON.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;

use evo_viewer::core::error::{Result, ViewerError};
use evo_viewer::core::ViewerConfig;
use evo_viewer::engine::DriftEngine;
use evo_viewer::render::PixelCanvas;
use evo_viewer::simulation::{FrameScheduler, ImmediateScheduler, StatsLog, TracingSink, Viewer};

/// Headless Evo Viewer - fixed number of frames, no window
#[derive(Parser, Debug)]
#[command(name = "headless")]
#[command(about = "Run the viewer frame loop without a window and dump the result")]
struct Args {
    /// Frames to run (one tick each)
    #[arg(long, default_value_t = 5000)]
    frames: u64,

    /// Force a generation once this many frames have run, below --frames (repeatable, or comma separated)
    #[arg(long, value_delimiter = ',')]
    force_at: Vec<u64>,

    /// Write the final frame here
    #[arg(long)]
    png: Option<PathBuf>,

    /// Write the final world snapshot here as JSON
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Device pixels per logical point (default 1.0)
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

    check_force_at(args.frames, &args.force_at)?;

    let engine = DriftEngine::new(config.engine.clone());
    let seed = engine.seed();
    tracing::info!(seed, frames = args.frames, "headless run");

    let mut viewer = Viewer::from_config(engine, &config, args.pixel_ratio, (TracingSink, StatsLog::new()))?
        .with_frame_limit(args.frames);
    let (width, height) = viewer.frame_loop().mapper().geometry().device_pixels();
    let mut canvas = PixelCanvas::new(width, height);

    let scheduler = ImmediateScheduler::new();
    scheduler.request_frame();
    while scheduler.take_request() {
        let done = viewer.frame_loop().frames();
        for _ in args.force_at.iter().filter(|&&at| at == done) {
            viewer.force_generation()?;
        }
        viewer.frame(&mut canvas, &scheduler)?;
    }

    let driver = viewer.driver();
    tracing::info!(
        frames = viewer.frame_loop().frames(),
        generations = driver.generation(),
        forced = viewer.trigger().presses(),
        seed,
        "run complete"
    );

    if let Some(path) = &args.png {
        canvas.save_png(path)?;
        tracing::info!(path = %path.display(), width, height, "frame written");
    }

    if let Some(path) = &args.snapshot {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, viewer.snapshot())?;
        tracing::info!(path = %path.display(), "snapshot written");
    }

    Ok(())
}

/// Every force point must come before the last frame runs.
fn check_force_at(frames: u64, force_at: &[u64]) -> Result<()> {
    match force_at.iter().find(|&&at| at >= frames) {
        Some(at) => Err(ViewerError::InvalidConfig(format!(
            "--force-at {} never fires in a {} frame run",
            at, frames
        ))),
        None => Ok(()),
    }
}
