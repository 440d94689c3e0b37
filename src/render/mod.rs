//! 2D drawing of simulation snapshots.
//!
//! Read-only with respect to the simulation: everything here takes a
//! `WorldSnapshot` by reference and only writes pixels.

pub mod camera;
pub mod canvas;
pub mod colors;
pub mod entities;
pub mod surface;

pub use camera::{CoordinateMapper, ViewportGeometry};
pub use canvas::PixelCanvas;
pub use colors::Color;
pub use entities::{EntityRenderer, EntitySizes};
pub use surface::{DrawCommand, DrawingContext, RecordingContext};
