//! Streaming texture holding the CPU canvas.

use thiserror::Error;

/// Bytes per pixel for RGBA textures.
const BYTES_PER_PIXEL: u32 = 4;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TextureError {
    #[error("Invalid texture dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },
}

/// Byte length of a tightly packed RGBA image.
pub fn rgba_len(width: u32, height: u32) -> Result<usize, TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL as usize))
        .ok_or(TextureError::InvalidDimensions { width, height })
}

/// GPU copy of the canvas, rewritten every frame.
pub struct FrameTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl FrameTexture {
    pub fn new(
        device: &wgpu::Device,
        dimensions: (u32, u32),
        label: Option<&str>,
    ) -> Result<Self, TextureError> {
        rgba_len(dimensions.0, dimensions.1)?;

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size: Self::extent(dimensions),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Nearest keeps 1px strokes crisp at integer scale factors
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Ok(Self {
            texture,
            view,
            sampler,
            width: dimensions.0,
            height: dimensions.1,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Overwrite the whole texture with tightly packed RGBA bytes.
    pub fn upload(&self, queue: &wgpu::Queue, rgba: &[u8]) -> Result<(), TextureError> {
        let expected = rgba_len(self.width, self.height)?;
        if rgba.len() != expected {
            return Err(TextureError::BufferSizeMismatch {
                expected,
                actual: rgba.len(),
            });
        }

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(BYTES_PER_PIXEL * self.width),
                rows_per_image: Some(self.height),
            },
            Self::extent(self.dimensions()),
        );
        Ok(())
    }

    fn extent(dimensions: (u32, u32)) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: dimensions.0,
            height: dimensions.1,
            depth_or_array_layers: 1,
        }
    }
}
