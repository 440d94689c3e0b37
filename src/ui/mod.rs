//! UI module - egui control strip for the window binary

pub mod panel;
pub mod state;

pub use panel::draw_panel;
pub use state::{ControlPanel, PanelStatus};
