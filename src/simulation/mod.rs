//! Driving the engine and the frame loop around it.

pub mod driver;
pub mod frame_loop;
pub mod sink;
pub mod trigger;
pub mod viewer;

pub use driver::{GenerationStats, SimulationDriver};
pub use frame_loop::{FrameLoop, FrameScheduler, FrameStatus, ImmediateScheduler, StopHandle};
pub use sink::{StatsLog, StatsOrigin, StatsSink, TracingSink};
pub use trigger::ManualTrigger;
pub use viewer::Viewer;
