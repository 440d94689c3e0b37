//! Presentation timing and upload counters.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frames averaged for the FPS readout
const WINDOW: usize = 120;

/// Tracks presentation cost over the last `WINDOW` frames.
pub struct RenderMetrics {
    frame_times: VecDeque<Duration>,
    last_frame_start: Instant,
    pub draw_calls: u32,
    pub uploaded_bytes: usize,
    pub texture_reallocations: u32,
}

impl Default for RenderMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderMetrics {
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(WINDOW),
            last_frame_start: Instant::now(),
            draw_calls: 0,
            uploaded_bytes: 0,
            texture_reallocations: 0,
        }
    }

    /// Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.last_frame_start = Instant::now();
        self.draw_calls = 0;
        self.uploaded_bytes = 0;
    }

    /// Call at the end of each frame.
    pub fn end_frame(&mut self) {
        let elapsed = self.last_frame_start.elapsed();
        self.frame_times.push_back(elapsed);
        if self.frame_times.len() > WINDOW {
            self.frame_times.pop_front();
        }
    }

    pub fn record_draw_call(&mut self) {
        self.draw_calls += 1;
    }

    pub fn record_upload(&mut self, bytes: usize) {
        self.uploaded_bytes += bytes;
    }

    /// Counted across frames; not reset by `begin_frame`.
    pub fn record_reallocation(&mut self) {
        self.texture_reallocations += 1;
    }

    /// Average frame time in milliseconds.
    pub fn avg_frame_time_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let sum: Duration = self.frame_times.iter().sum();
        sum.as_secs_f32() * 1000.0 / self.frame_times.len() as f32
    }

    pub fn fps(&self) -> f32 {
        let ms = self.avg_frame_time_ms();
        if ms > 0.0 {
            1000.0 / ms
        } else {
            0.0
        }
    }

    pub fn last_frame_time_ms(&self) -> f32 {
        self.frame_times
            .back()
            .map(|d| d.as_secs_f32() * 1000.0)
            .unwrap_or(0.0)
    }
}
