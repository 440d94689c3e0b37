//! The self-rescheduling frame loop.
//!
//! One iteration is clear, tick, report, snapshot, draw, then a request
//! for the next display refresh. The host owns the actual waiting: a winit
//! window answers a request with `RedrawRequested`, the headless runner
//! with an immediate call. Ticks are 1:1 with frames; nothing is skipped
//! or caught up.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::driver::SimulationDriver;
use super::sink::{StatsOrigin, StatsSink};
use crate::core::error::Result;
use crate::engine::Engine;
use crate::render::camera::CoordinateMapper;
use crate::render::entities::{EntityRenderer, EntitySizes};
use crate::render::surface::DrawingContext;

/// Host hook that runs the next iteration on the next display refresh.
pub trait FrameScheduler {
    /// Must not block or run the frame inline.
    fn request_frame(&self);
}

impl FrameScheduler for winit::window::Window {
    fn request_frame(&self) {
        self.request_redraw();
    }
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for Arc<S> {
    fn request_frame(&self) {
        (**self).request_frame()
    }
}

/// Scheduler that remembers a request until the caller takes it.
#[derive(Debug, Default)]
pub struct ImmediateScheduler {
    pending: Cell<bool>,
    requests: Cell<u64>,
}

impl ImmediateScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the pending request, if any.
    pub fn take_request(&self) -> bool {
        self.pending.replace(false)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Requests received since creation.
    pub fn requests(&self) -> u64 {
        self.requests.get()
    }
}

impl FrameScheduler for ImmediateScheduler {
    fn request_frame(&self) {
        self.pending.set(true);
        self.requests.set(self.requests.get() + 1);
    }
}

/// Cancellation token for a `FrameLoop`.
///
/// Observed only between iterations.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Outcome of one `run_frame` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// The next iteration was requested from the scheduler
    Scheduled,
    /// The loop is stopped; nothing was requested
    Stopped,
}

pub struct FrameLoop {
    mapper: CoordinateMapper,
    sizes: EntitySizes,
    stop: StopHandle,
    frame_limit: Option<u64>,
    frames: u64,
}

impl FrameLoop {
    pub fn new(mapper: CoordinateMapper, sizes: EntitySizes) -> Self {
        Self {
            mapper,
            sizes,
            stop: StopHandle::new(),
            frame_limit: None,
            frames: 0,
        }
    }

    /// Stop after `limit` iterations.
    pub fn with_frame_limit(mut self, limit: u64) -> Self {
        self.frame_limit = Some(limit);
        self
    }

    pub fn set_frame_limit(&mut self, limit: Option<u64>) {
        self.frame_limit = limit;
    }

    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Iterations completed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_running(&self) -> bool {
        !self.stop.is_stopped() && self.frame_limit.map_or(true, |limit| self.frames < limit)
    }

    /// Run one iteration and request the next one.
    ///
    /// An engine fault stops the loop for good and is returned unchanged.
    /// The surface is left cleared; nothing from the faulted frame is drawn.
    pub fn run_frame<E, C, S, F>(
        &mut self,
        driver: &mut SimulationDriver<E>,
        surface: &mut C,
        sink: &mut S,
        scheduler: &F,
    ) -> Result<FrameStatus>
    where
        E: Engine,
        C: DrawingContext + ?Sized,
        S: StatsSink + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        if !self.is_running() {
            return Ok(FrameStatus::Stopped);
        }

        let geometry = self.mapper.geometry();
        surface.clear_rect(0.0, 0.0, geometry.device_width(), geometry.device_height());

        let frame = self.frames + 1;
        match driver.tick() {
            Ok(Some(stats)) => sink.emit(StatsOrigin::Frame(frame), &stats),
            Ok(None) => {}
            Err(err) => {
                self.stop.stop();
                tracing::error!(frame, "engine fault, frame loop halted: {}", err);
                return Err(err);
            }
        }

        let world = driver.snapshot();
        EntityRenderer::new(surface).draw_world(world, &self.mapper, self.sizes);
        self.frames = frame;

        if self.is_running() {
            scheduler.request_frame();
            Ok(FrameStatus::Scheduled)
        } else {
            tracing::debug!(frames = self.frames, "frame loop stopped");
            Ok(FrameStatus::Stopped)
        }
    }

    /// Run iterations back to back until the loop stops.
    ///
    /// Never returns on its own without a frame limit or a stop from
    /// another thread.
    pub fn drive<E, C, S>(
        &mut self,
        driver: &mut SimulationDriver<E>,
        surface: &mut C,
        sink: &mut S,
    ) -> Result<u64>
    where
        E: Engine,
        C: DrawingContext + ?Sized,
        S: StatsSink + ?Sized,
    {
        let scheduler = ImmediateScheduler::new();
        let start = self.frames;
        scheduler.request_frame();
        while scheduler.take_request() {
            if self.run_frame(driver, surface, sink, &scheduler)? == FrameStatus::Stopped {
                break;
            }
        }
        Ok(self.frames - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Animal, Food, ScriptedEngine, WorldSnapshot};
    use crate::render::camera::ViewportGeometry;
    use crate::render::surface::{DrawCommand, RecordingContext};
    use crate::simulation::sink::StatsLog;

    fn world() -> WorldSnapshot {
        WorldSnapshot::new(vec![Food::new(0.5, 0.5)], vec![Animal::new(0.25, 0.25, 0.0)])
    }

    fn frame_loop() -> FrameLoop {
        let mapper = CoordinateMapper::new(ViewportGeometry::new(100.0, 80.0, 2.0));
        FrameLoop::new(mapper, EntitySizes::default())
    }

    #[test]
    fn test_one_line_on_boundary_frame() {
        let mut driver = SimulationDriver::new(ScriptedEngine::new(world(), 3));
        let mut frame_loop = frame_loop().with_frame_limit(5);
        let mut surface = RecordingContext::new();
        let mut log = StatsLog::new();

        let frames = frame_loop.drive(&mut driver, &mut surface, &mut log).unwrap();

        assert_eq!(frames, 5);
        assert_eq!(log.len(), 1);
        let origins: Vec<StatsOrigin> = log.entries().map(|(origin, _)| *origin).collect();
        assert_eq!(origins, vec![StatsOrigin::Frame(3)]);
    }

    #[test]
    fn test_frame_starts_with_full_clear() {
        let mut driver = SimulationDriver::new(ScriptedEngine::new(world(), 100));
        let mut frame_loop = frame_loop();
        let mut surface = RecordingContext::new();
        let scheduler = ImmediateScheduler::new();

        let status = frame_loop
            .run_frame(&mut driver, &mut surface, &mut StatsLog::new(), &scheduler)
            .unwrap();

        assert_eq!(status, FrameStatus::Scheduled);
        assert!(scheduler.take_request());
        assert_eq!(
            surface.commands()[0],
            DrawCommand::ClearRect { x: 0.0, y: 0.0, width: 200.0, height: 160.0 }
        );
        assert_eq!(surface.fill_count(), 2);
    }

    #[test]
    fn test_stopped_loop_does_not_reschedule() {
        let mut driver = SimulationDriver::new(ScriptedEngine::new(world(), 100));
        let mut frame_loop = frame_loop();
        let stop = frame_loop.stop_handle();
        let scheduler = ImmediateScheduler::new();
        let mut surface = RecordingContext::new();

        stop.stop();
        let status = frame_loop
            .run_frame(&mut driver, &mut surface, &mut StatsLog::new(), &scheduler)
            .unwrap();

        assert_eq!(status, FrameStatus::Stopped);
        assert_eq!(scheduler.requests(), 0);
        assert!(surface.commands().is_empty());
        assert_eq!(driver.ticks(), 0);
    }

    #[test]
    fn test_last_limited_frame_is_not_rescheduled() {
        let mut driver = SimulationDriver::new(ScriptedEngine::new(world(), 100));
        let mut frame_loop = frame_loop().with_frame_limit(2);
        let scheduler = ImmediateScheduler::new();
        let mut surface = RecordingContext::new();
        let mut log = StatsLog::new();

        let first = frame_loop.run_frame(&mut driver, &mut surface, &mut log, &scheduler);
        let second = frame_loop.run_frame(&mut driver, &mut surface, &mut log, &scheduler);

        assert_eq!(first.unwrap(), FrameStatus::Scheduled);
        assert_eq!(second.unwrap(), FrameStatus::Stopped);
        assert_eq!(scheduler.requests(), 1);
        assert!(!frame_loop.is_running());
    }

    #[test]
    fn test_engine_fault_halts_loop() {
        let engine = ScriptedEngine::new(world(), 100).with_fault_at(2);
        let mut driver = SimulationDriver::new(engine);
        let mut frame_loop = frame_loop();
        let scheduler = ImmediateScheduler::new();
        let mut surface = RecordingContext::new();
        let mut log = StatsLog::new();

        frame_loop.run_frame(&mut driver, &mut surface, &mut log, &scheduler).unwrap();
        assert!(scheduler.take_request());
        surface.take();

        let result = frame_loop.run_frame(&mut driver, &mut surface, &mut log, &scheduler);
        assert!(result.is_err());
        // Cleared, then nothing drawn
        assert_eq!(
            surface.commands(),
            &[DrawCommand::ClearRect { x: 0.0, y: 0.0, width: 200.0, height: 160.0 }]
        );
        assert!(!scheduler.is_pending());
        assert!(!frame_loop.is_running());
        assert_eq!(frame_loop.frames(), 1);

        // Nothing runs after the fault
        let after = frame_loop.run_frame(&mut driver, &mut surface, &mut log, &scheduler);
        assert_eq!(after.unwrap(), FrameStatus::Stopped);
    }

    #[test]
    fn test_drive_propagates_fault() {
        let engine = ScriptedEngine::new(world(), 100).with_fault_at(4);
        let mut driver = SimulationDriver::new(engine);
        let mut frame_loop = frame_loop();

        let result = frame_loop.drive(&mut driver, &mut RecordingContext::new(), &mut StatsLog::new());
        assert!(result.is_err());
        assert_eq!(frame_loop.frames(), 3);
    }
}
