//! The graphics device seam the render loop drives.
//!
//! [`crate::Renderer`] implements it over wgpu; tests implement it in memory.

use crate::camera::{CameraUniform, OrthoCamera};
use crate::capture::RawFrame;
use crate::lighting::LightingConfig;
use crate::vertex::GpuVertex;
use engine_core::{Color, Result};
use glam::{Mat4, Vec3};
use std::ops::Range;

/// Everything one frame needs besides the vertex buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSetup {
    pub world: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub eye_direction: Vec3,
    pub lighting: LightingConfig,
    pub clear_color: Color,
    /// Unindexed triangle-list range to draw. Empty draws nothing but still clears.
    pub vertices: Range<u32>,
}

impl FrameSetup {
    pub fn new(camera: &OrthoCamera, lighting: LightingConfig, clear_color: Color, vertex_count: u32) -> Self {
        Self {
            world: Mat4::IDENTITY,
            view: camera.view_matrix(),
            projection: camera.projection_matrix(),
            eye_direction: camera.view_direction(),
            lighting,
            clear_color,
            vertices: 0..vertex_count,
        }
    }

    pub fn camera_uniform(&self) -> CameraUniform {
        CameraUniform::new(self.world, self.view, self.projection, self.eye_direction)
    }

    pub fn clear_wgpu(&self) -> wgpu::Color {
        wgpu::Color {
            r: self.clear_color.r as f64,
            g: self.clear_color.g as f64,
            b: self.clear_color.b as f64,
            a: 1.0,
        }
    }
}

/// Opaque GPU capabilities used by the render loop.
pub trait GraphicsDevice {
    type VertexBuffer;
    /// Off-screen color target. Released when dropped.
    type RenderTarget;

    /// Current presentable back-buffer size in pixels.
    fn back_buffer_size(&self) -> (u32, u32);

    fn create_vertex_buffer(&mut self, vertices: &[GpuVertex]) -> Result<Self::VertexBuffer>;

    fn create_render_target(&mut self, width: u32, height: u32) -> Result<Self::RenderTarget>;

    /// Clear, configure and draw one frame into `target`, or to the
    /// presentable back buffer when `target` is `None`.
    fn draw(
        &mut self,
        setup: &FrameSetup,
        vertices: &Self::VertexBuffer,
        target: Option<&Self::RenderTarget>,
    ) -> Result<()>;

    /// Read back the full contents of `target`. Blocks until the GPU is done.
    fn read_pixels(&mut self, target: &Self::RenderTarget) -> Result<RawFrame>;
}
