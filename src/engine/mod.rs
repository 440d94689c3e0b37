//! Engine boundary.
//!
//! The evolution engine is a collaborator the viewer only drives: it steps
//! the world, reports fitness when a generation ends, and exposes what to
//! draw. Everything behind this trait (movement, brains, selection,
//! mutation) belongs to the implementor.

pub mod drift;
pub mod scripted;
pub mod snapshot;

use crate::core::error::Result;

pub use drift::DriftEngine;
pub use scripted::ScriptedEngine;
pub use snapshot::{Animal, Food, WorldSnapshot};

/// Fitness summary of a finished generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessStats {
    pub min: f32,
    pub max: f32,
    pub avg: f32,
}

impl FitnessStats {
    pub const fn new(min: f32, max: f32, avg: f32) -> Self {
        Self { min, max, avg }
    }

    /// Summarize a population's fitness scores.
    ///
    /// An empty population yields all zeros.
    pub fn from_scores(scores: impl IntoIterator<Item = f32>) -> Self {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        let mut sum = 0.0;
        let mut count = 0usize;

        for score in scores {
            min = min.min(score);
            max = max.max(score);
            sum += score;
            count += 1;
        }

        if count == 0 {
            return Self::new(0.0, 0.0, 0.0);
        }

        Self::new(min, max, sum / count as f32)
    }
}

/// A steppable population simulation.
///
/// Calls never overlap: the viewer drives one engine from one thread.
pub trait Engine {
    /// Advance exactly one time step.
    ///
    /// Returns `Some` only on the tick that ends a generation.
    fn tick(&mut self) -> Result<Option<FitnessStats>>;

    /// Finish the running generation right away.
    ///
    /// Always crosses a boundary, so a summary is always returned. The
    /// next `tick` belongs to the following generation.
    fn force_generation(&mut self) -> Result<FitnessStats>;

    /// Current world state; does not advance anything.
    fn snapshot(&self) -> &WorldSnapshot;
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn tick(&mut self) -> Result<Option<FitnessStats>> {
        (**self).tick()
    }

    fn force_generation(&mut self) -> Result<FitnessStats> {
        (**self).force_generation()
    }

    fn snapshot(&self) -> &WorldSnapshot {
        (**self).snapshot()
    }
}
