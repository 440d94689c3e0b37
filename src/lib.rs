//! Evo Viewer - real-time viewer and control harness for evolving agent simulations

pub mod core;
pub mod engine;
pub mod render;
pub mod renderer;
pub mod simulation;
pub mod ui;
