//! wgpu presenter for the CPU canvas.
//!
//! The presenter only reads finished canvas pixels. Each frame it uploads
//! them into a texture, blits that over the clear color, then hands the
//! encoder to an overlay callback (the egui strip) before presenting.

pub mod gpu;
pub mod metrics;

use std::sync::Arc;

use thiserror::Error;
use winit::window::Window;

use crate::core::error::Result;
use crate::render::canvas::PixelCanvas;
use crate::render::colors::BACKGROUND;
use gpu::{BlitPipeline, FrameTexture, GpuContext, TextureError};

pub use metrics::RenderMetrics;

#[derive(Error, Debug)]
pub enum PresentError {
    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),
}

struct CanvasBinding {
    texture: FrameTexture,
    bind_group: wgpu::BindGroup,
}

pub struct Presenter {
    ctx: GpuContext,
    pipeline: BlitPipeline,
    canvas: Option<CanvasBinding>,
    metrics: RenderMetrics,
}

impl Presenter {
    /// Set up the GPU for the given window.
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let ctx = GpuContext::new(window).await?;
        let pipeline = BlitPipeline::new(&ctx);

        Ok(Self {
            ctx,
            pipeline,
            canvas: None,
            metrics: RenderMetrics::new(),
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.ctx.device
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.ctx.format()
    }

    /// Handle window resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
    }

    /// Current surface size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        self.ctx.size()
    }

    pub fn metrics(&self) -> &RenderMetrics {
        &self.metrics
    }

    /// Present the canvas, letting `overlay` record extra passes onto the
    /// same surface texture before submission.
    pub fn present_with_overlay<F>(
        &mut self,
        canvas: &PixelCanvas,
        overlay: F,
    ) -> std::result::Result<(), PresentError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        self.metrics.begin_frame();

        self.upload_canvas(canvas)?;

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Present Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Canvas Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(binding) = &self.canvas {
                render_pass.set_pipeline(&self.pipeline.render_pipeline);
                render_pass.set_bind_group(0, &binding.bind_group, &[]);
                render_pass.draw(0..3, 0..1);
                self.metrics.record_draw_call();
            }
        }

        overlay(&self.ctx.device, &self.ctx.queue, &mut encoder, &view);

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.metrics.end_frame();
        Ok(())
    }

    fn upload_canvas(&mut self, canvas: &PixelCanvas) -> std::result::Result<(), TextureError> {
        let size = canvas.size();
        let stale = self
            .canvas
            .as_ref()
            .map_or(true, |binding| binding.texture.dimensions() != size);

        if stale {
            let texture = FrameTexture::new(&self.ctx.device, size, Some("Canvas Texture"))?;
            let bind_group = self
                .pipeline
                .create_texture_bind_group(&self.ctx.device, &texture);
            tracing::debug!(width = size.0, height = size.1, "canvas texture allocated");
            self.metrics.record_reallocation();
            self.canvas = Some(CanvasBinding { texture, bind_group });
        }

        if let Some(binding) = &self.canvas {
            binding.texture.upload(&self.ctx.queue, canvas.as_raw())?;
            self.metrics.record_upload(canvas.as_raw().len());
        }
        Ok(())
    }
}
