//! Composition root: one engine, one loop, one trigger, one sink.

use super::driver::{GenerationStats, SimulationDriver};
use super::frame_loop::{FrameLoop, FrameScheduler, FrameStatus, StopHandle};
use super::sink::StatsSink;
use super::trigger::ManualTrigger;
use crate::core::config::ViewerConfig;
use crate::core::error::{Result, ViewerError};
use crate::engine::{Engine, WorldSnapshot};
use crate::render::camera::{CoordinateMapper, ViewportGeometry};
use crate::render::entities::EntitySizes;
use crate::render::surface::DrawingContext;

pub struct Viewer<E, S> {
    driver: SimulationDriver<E>,
    frame_loop: FrameLoop,
    trigger: ManualTrigger,
    sink: S,
}

impl<E: Engine, S: StatsSink> Viewer<E, S> {
    pub fn new(engine: E, frame_loop: FrameLoop, sink: S) -> Self {
        Self {
            driver: SimulationDriver::new(engine),
            frame_loop,
            trigger: ManualTrigger::new(),
            sink,
        }
    }

    /// Build from config; `pixel_ratio` overrides the configured ratio.
    ///
    /// The config is validated with the override applied.
    pub fn from_config(
        engine: E,
        config: &ViewerConfig,
        pixel_ratio: Option<f32>,
        sink: S,
    ) -> Result<Self> {
        let mut resolved = config.clone();
        if pixel_ratio.is_some() {
            resolved.viewport.pixel_ratio = pixel_ratio;
        }
        resolved.validate().map_err(ViewerError::InvalidConfig)?;

        let viewport = &resolved.viewport;
        let geometry = ViewportGeometry::with_optional_ratio(
            viewport.logical_width,
            viewport.logical_height,
            viewport.pixel_ratio,
        );
        tracing::info!(
            logical_width = geometry.logical_width,
            logical_height = geometry.logical_height,
            pixel_ratio = geometry.pixel_ratio,
            "viewport"
        );
        let frame_loop = FrameLoop::new(CoordinateMapper::new(geometry), EntitySizes::from(&resolved.entities));
        Ok(Self::new(engine, frame_loop, sink))
    }

    /// Stop the loop after `limit` iterations.
    pub fn with_frame_limit(mut self, limit: u64) -> Self {
        self.frame_loop.set_frame_limit(Some(limit));
        self
    }

    /// One frame loop iteration.
    pub fn frame<C, F>(&mut self, surface: &mut C, scheduler: &F) -> Result<FrameStatus>
    where
        C: DrawingContext + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        self.frame_loop
            .run_frame(&mut self.driver, surface, &mut self.sink, scheduler)
    }

    /// Run frames back to back until the loop stops.
    pub fn run<C: DrawingContext + ?Sized>(&mut self, surface: &mut C) -> Result<u64> {
        self.frame_loop.drive(&mut self.driver, surface, &mut self.sink)
    }

    /// The manual control.
    pub fn force_generation(&mut self) -> Result<GenerationStats> {
        self.trigger.fire(&mut self.driver, &mut self.sink)
    }

    pub fn snapshot(&self) -> &WorldSnapshot {
        self.driver.snapshot()
    }

    pub fn driver(&self) -> &SimulationDriver<E> {
        &self.driver
    }

    pub fn frame_loop(&self) -> &FrameLoop {
        &self.frame_loop
    }

    pub fn trigger(&self) -> &ManualTrigger {
        &self.trigger
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.frame_loop.stop_handle()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

}
