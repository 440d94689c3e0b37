//! GPU abstractions for wgpu.

pub mod context;
pub mod pipeline;
pub mod texture;

pub use context::GpuContext;
pub use pipeline::BlitPipeline;
pub use texture::{FrameTexture, TextureError};
