//! wgpu-backed graphics device.

use crate::{
    camera::CameraUniform,
    capture::{padded_bytes_per_row, RawFrame},
    device::{FrameSetup, GraphicsDevice},
    lighting::{LightingConfig, LightingUniform},
    mesh::Mesh,
    pipeline::{create_frame_bind_group_layout, create_render_pipeline, create_shader},
    texture::{RenderTarget, Texture},
    vertex::GpuVertex,
};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// Window surface state. Absent for headless renderers.
struct Presentation {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: Texture,
    window: Arc<Window>,
}

/// Main renderer state.
pub struct Renderer {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    presentation: Option<Presentation>,
    size: (u32, u32),

    shader: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
    pipelines: HashMap<wgpu::TextureFormat, wgpu::RenderPipeline>,

    frame_bind_group: wgpu::BindGroup,
    camera_buffer: wgpu::Buffer,
    lighting_buffer: wgpu::Buffer,
}

impl Renderer {
    /// Create a renderer presenting to `window`.
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;
        let (adapter, device, queue) = request_device(&instance, Some(&surface)).await?;

        // Vertex colors are authored in display space; prefer a non-sRGB target so
        // they reach the screen unconverted.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_texture = Texture::create_depth_texture(&device, config.width, config.height, "Depth Texture");

        let presentation = Presentation {
            surface,
            config,
            depth_texture,
            window,
        };
        let size = (presentation.config.width, presentation.config.height);
        Ok(Self::with_device(device, queue, Some(presentation), size))
    }

    /// Create a renderer with no window whose back buffer is `width` x `height`.
    /// It can only draw into render targets.
    pub async fn headless(width: u32, height: u32) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let (_adapter, device, queue) = request_device(&instance, None).await?;
        Ok(Self::with_device(device, queue, None, (width, height)))
    }

    fn with_device(
        device: wgpu::Device,
        queue: wgpu::Queue,
        presentation: Option<Presentation>,
        size: (u32, u32),
    ) -> Self {
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[CameraUniform::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let lighting_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lighting Buffer"),
            contents: bytemuck::cast_slice(&[LightingUniform::from(&LightingConfig::default())]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = create_frame_bind_group_layout(&device);
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lighting_buffer.as_entire_binding(),
                },
            ],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Frame Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let shader = create_shader(&device);

        Self {
            device,
            queue,
            presentation,
            size,
            shader,
            pipeline_layout,
            pipelines: HashMap::new(),
            frame_bind_group,
            camera_buffer,
            lighting_buffer,
        }
    }

    /// Handle window resize.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = (new_size.width, new_size.height);
        if let Some(p) = &mut self.presentation {
            p.config.width = new_size.width;
            p.config.height = new_size.height;
            p.surface.configure(&self.device, &p.config);
            p.depth_texture =
                Texture::create_depth_texture(&self.device, p.config.width, p.config.height, "Depth Texture");
        }
    }

    pub fn request_redraw(&self) {
        if let Some(p) = &self.presentation {
            p.window.request_redraw();
        }
    }

    /// Get back buffer dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        self.size
    }

    fn ensure_pipeline(&mut self, format: wgpu::TextureFormat) {
        let Self {
            device,
            pipeline_layout,
            shader,
            pipelines,
            ..
        } = self;
        pipelines
            .entry(format)
            .or_insert_with(|| create_render_pipeline(device, pipeline_layout, shader, format));
    }

    /// Write per-frame uniforms and record the clear + draw pass.
    fn encode_frame(
        &mut self,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        format: wgpu::TextureFormat,
        setup: &FrameSetup,
        mesh: &Mesh,
    ) -> wgpu::CommandEncoder {
        self.ensure_pipeline(format);
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[setup.camera_uniform()]));
        self.queue.write_buffer(
            &self.lighting_buffer,
            0,
            bytemuck::cast_slice(&[LightingUniform::from(&setup.lighting)]),
        );

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Cube Stack Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(setup.clear_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Empty meshes own no buffer; the pass still clears.
            let range = setup.vertices.start..setup.vertices.end.min(mesh.num_vertices);
            if let (Some(buffer), false) = (&mesh.vertex_buffer, range.is_empty()) {
                render_pass.set_pipeline(&self.pipelines[&format]);
                render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                render_pass.draw(range, 0..1);
            }
        }
        encoder
    }
}

async fn request_device(
    instance: &wgpu::Instance,
    surface: Option<&wgpu::Surface<'static>>,
) -> Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue)> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: surface,
            force_fallback_adapter: false,
        })
        .await
        .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

    log::info!("Using GPU: {:?}", adapter.get_info().name);

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Main Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
                memory_hints: Default::default(),
            },
            None,
        )
        .await
        .context("Failed to create GPU device")?;
    Ok((adapter, device, queue))
}

fn device_error(what: &str, err: impl std::fmt::Display) -> engine_core::Error {
    engine_core::Error::Device(format!("{what}: {err}"))
}

impl GraphicsDevice for Renderer {
    type VertexBuffer = Mesh;
    type RenderTarget = RenderTarget;

    fn back_buffer_size(&self) -> (u32, u32) {
        self.size
    }

    fn create_vertex_buffer(&mut self, vertices: &[GpuVertex]) -> engine_core::Result<Mesh> {
        Mesh::new(&self.device, vertices)
    }

    fn create_render_target(&mut self, width: u32, height: u32) -> engine_core::Result<RenderTarget> {
        RenderTarget::new(&self.device, width, height)
    }

    fn draw(
        &mut self,
        setup: &FrameSetup,
        mesh: &Mesh,
        target: Option<&RenderTarget>,
    ) -> engine_core::Result<()> {
        if let Some(target) = target {
            let encoder = self.encode_frame(
                &target.color.view,
                &target.depth.view,
                RenderTarget::COLOR_FORMAT,
                setup,
                mesh,
            );
            self.queue.submit(std::iter::once(encoder.finish()));
            return Ok(());
        }

        let presentation = self
            .presentation
            .as_ref()
            .ok_or_else(|| engine_core::Error::Device("headless renderer has no back buffer".into()))?;
        let output = presentation
            .surface
            .get_current_texture()
            .map_err(|e| device_error("surface acquisition failed", e))?;
        let format = presentation.config.format;
        // Owned views so no borrow of the presentation outlives this block.
        let depth_view = presentation
            .depth_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let color_view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self.encode_frame(&color_view, &depth_view, format, setup, mesh);
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn read_pixels(&mut self, target: &RenderTarget) -> engine_core::Result<RawFrame> {
        let bytes_per_row = padded_bytes_per_row(target.width);
        let output_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Capture Readback Buffer"),
            size: bytes_per_row as u64 * target.height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Capture Encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &target.color.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &output_buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(target.height),
                },
            },
            wgpu::Extent3d {
                width: target.width,
                height: target.height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = output_buffer.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);
        receiver
            .recv()
            .map_err(|e| device_error("readback channel closed", e))?
            .map_err(|e| device_error("failed to map readback buffer", e))?;

        let data = buffer_slice.get_mapped_range().to_vec();
        output_buffer.unmap();

        Ok(RawFrame {
            data,
            width: target.width,
            height: target.height,
            bytes_per_row,
        })
    }
}
