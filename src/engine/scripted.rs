//! Deterministic stub engine.
//!
//! Holds a fixed world and crosses a generation boundary every
//! `generation_length` ticks. Used to pin down the viewer's ordering
//! guarantees without a real simulation behind it.

use super::{Engine, FitnessStats, WorldSnapshot};
use crate::core::error::{Result, ViewerError};

#[derive(Debug, Clone)]
pub struct ScriptedEngine {
    world: WorldSnapshot,
    generation_length: u64,
    age: u64,
    ticks: u64,
    generations: u64,
    fault_at: Option<u64>,
}

impl ScriptedEngine {
    pub fn new(world: WorldSnapshot, generation_length: u64) -> Self {
        Self {
            world,
            generation_length: generation_length.max(1),
            age: 0,
            ticks: 0,
            generations: 0,
            fault_at: None,
        }
    }

    /// Make the `tick`-th call to `tick` (1-based) fail with an engine fault.
    pub fn with_fault_at(mut self, tick: u64) -> Self {
        self.fault_at = Some(tick);
        self
    }

    /// Ticks taken so far, including one that faulted.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Ticks into the running generation.
    pub fn age(&self) -> u64 {
        self.age
    }

    /// Generations completed, automatic and forced.
    pub fn generations(&self) -> u64 {
        self.generations
    }

    fn complete_generation(&mut self) -> FitnessStats {
        self.age = 0;
        self.generations += 1;
        let base = self.generations as f32;
        FitnessStats::new(base, base + 2.0, base + 1.0)
    }
}

impl Engine for ScriptedEngine {
    fn tick(&mut self) -> Result<Option<FitnessStats>> {
        self.ticks += 1;
        if self.fault_at == Some(self.ticks) {
            return Err(ViewerError::EngineFault(format!(
                "scripted fault at tick {}",
                self.ticks
            )));
        }

        self.age += 1;
        if self.age >= self.generation_length {
            Ok(Some(self.complete_generation()))
        } else {
            Ok(None)
        }
    }

    fn force_generation(&mut self) -> Result<FitnessStats> {
        Ok(self.complete_generation())
    }

    fn snapshot(&self) -> &WorldSnapshot {
        &self.world
    }
}
