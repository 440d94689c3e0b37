//! Simulation driver - the one owner of the engine handle
//!
//! Wraps an `Engine`, numbers generations, and turns the engine's fitness
//! summaries into printable `GenerationStats`.

use std::fmt;

use crate::core::error::Result;
use crate::engine::{Engine, FitnessStats, WorldSnapshot};

/// Summary of one completed generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// 1-based generation number
    pub generation: u64,
    pub fitness: FitnessStats,
}

impl fmt::Display for GenerationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:03}: min={:.2}, max={:.2}, avg={:.2}",
            self.generation, self.fitness.min, self.fitness.max, self.fitness.avg
        )
    }
}

pub struct SimulationDriver<E> {
    engine: E,
    generation: u64,
    ticks: u64,
    ticks_in_generation: u64,
}

impl<E: Engine> SimulationDriver<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            generation: 0,
            ticks: 0,
            ticks_in_generation: 0,
        }
    }

    /// Advance the engine by exactly one step.
    ///
    /// Returns stats only when this tick ended a generation.
    pub fn tick(&mut self) -> Result<Option<GenerationStats>> {
        let outcome = self.engine.tick()?;
        self.ticks += 1;
        self.ticks_in_generation += 1;
        Ok(outcome.map(|fitness| self.complete(fitness, false)))
    }

    /// Complete the running generation now.
    ///
    /// Leaves the tick cadence alone: the next `tick` is the first of the
    /// following generation.
    pub fn force_generation(&mut self) -> Result<GenerationStats> {
        let fitness = self.engine.force_generation()?;
        Ok(self.complete(fitness, true))
    }

    /// Current world; borrowed, so it cannot outlive the next tick.
    pub fn snapshot(&self) -> &WorldSnapshot {
        self.engine.snapshot()
    }

    /// Generations completed so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ticks driven since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Ticks driven since the last boundary.
    pub fn ticks_in_generation(&self) -> u64 {
        self.ticks_in_generation
    }

    fn complete(&mut self, fitness: FitnessStats, forced: bool) -> GenerationStats {
        self.generation += 1;
        tracing::debug!(
            generation = self.generation,
            ticks = self.ticks_in_generation,
            forced,
            "generation boundary"
        );
        self.ticks_in_generation = 0;
        GenerationStats {
            generation: self.generation,
            fitness,
        }
    }
}
