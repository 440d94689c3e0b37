//! The one user-invocable control: force the running generation to end.

use super::driver::{GenerationStats, SimulationDriver};
use super::sink::{StatsOrigin, StatsSink};
use crate::core::error::Result;
use crate::engine::Engine;

/// Label shown on the control
pub const FORCE_GENERATION_LABEL: &str = "Force generation";

/// Wires a press to `force_generation` and reports the result.
///
/// Never touches the surface or the frame loop; the frame after a press
/// simply draws the new generation.
#[derive(Debug, Default, Clone)]
pub struct ManualTrigger {
    presses: u64,
}

impl ManualTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fire<E, S>(&mut self, driver: &mut SimulationDriver<E>, sink: &mut S) -> Result<GenerationStats>
    where
        E: Engine,
        S: StatsSink + ?Sized,
    {
        self.presses += 1;
        let stats = driver.force_generation()?;
        sink.emit(StatsOrigin::Manual, &stats);
        Ok(stats)
    }

    /// Presses so far, including ones that faulted.
    pub fn presses(&self) -> u64 {
        self.presses
    }
}
