//! Textures owned by the renderer: depth buffers and off-screen capture targets.

use engine_core::{Error, Result};

/// A texture plus its default view.
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl Texture {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32, label: &str) -> Self {
        Self::create_2d(
            device,
            width,
            height,
            Self::DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
            label,
        )
    }

    fn create_2d(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
        label: &str,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

/// Off-screen color + depth target for frame capture. Stores BGRA, readable
/// back to the CPU. Both textures are destroyed when the target is dropped.
pub struct RenderTarget {
    pub color: Texture,
    pub depth: Texture,
    pub width: u32,
    pub height: u32,
}

impl RenderTarget {
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8Unorm;

    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Result<Self> {
        let max = device.limits().max_texture_dimension_2d;
        if width == 0 || height == 0 || width > max || height > max {
            return Err(Error::resource_creation(format!(
                "capture target {width}x{height} unsupported (max {max})"
            )));
        }

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let color = Texture::create_2d(
            device,
            width,
            height,
            Self::COLOR_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            "Capture Color",
        );
        let depth = Texture::create_depth_texture(device, width, height, "Capture Depth");
        let oom = pollster::block_on(device.pop_error_scope());
        let invalid = pollster::block_on(device.pop_error_scope());
        if let Some(err) = oom.or(invalid) {
            color.texture.destroy();
            depth.texture.destroy();
            return Err(Error::resource_creation(err.to_string()));
        }

        Ok(Self {
            color,
            depth,
            width,
            height,
        })
    }
}

impl Drop for RenderTarget {
    fn drop(&mut self) {
        self.color.texture.destroy();
        self.depth.texture.destroy();
    }
}
