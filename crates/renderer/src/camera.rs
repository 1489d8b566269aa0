//! Fixed isometric-style orthographic camera.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Default orthographic view width in world units.
pub const DEFAULT_VIEW_WIDTH: f32 = 40.0;
/// Blend factor between `width` and `width * sqrt(3) / 2` used for the view height.
pub const HEIGHT_ADJUST: f32 = 0.125;
/// Far plane distance; contains the whole stack from the eye.
pub const DEFAULT_VIEW_DEPTH: f32 = 80.0;

/// `height = width * (1 - adjust) + adjust * (width * sqrt(3) / 2)`.
pub fn framed_height(width: f32, adjust: f32) -> f32 {
    width * (1.0 - adjust) + adjust * (width * 3.0_f32.sqrt() / 2.0)
}

/// Orthographic look-at camera. Computed once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub width: f32,
    pub height: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrthoCamera {
    fn default() -> Self {
        Self::framing(Vec3::ZERO, DEFAULT_VIEW_WIDTH)
    }
}

impl OrthoCamera {
    /// Camera looking at `target` along the (-1, -1, -1) diagonal with +Z up.
    pub fn framing(target: Vec3, width: f32) -> Self {
        Self {
            eye: target + Vec3::splat(width / 2.0),
            target,
            up: Vec3::Z,
            width,
            height: framed_height(width, HEIGHT_ADJUST),
            near: 0.0,
            far: DEFAULT_VIEW_DEPTH,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Centered orthographic projection, depth mapped to wgpu's 0..1 range.
    pub fn projection_matrix(&self) -> Mat4 {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        Mat4::orthographic_rh(-hw, hw, -hh, hh, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Direction the camera looks in (same for every pixel in orthographic).
    pub fn view_direction(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }
}

/// Camera uniform data for GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub world: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    /// xyz = view direction, w unused.
    pub eye_direction: [f32; 4],
}

impl CameraUniform {
    pub fn new(world: Mat4, view: Mat4, projection: Mat4, eye_direction: Vec3) -> Self {
        Self {
            world: world.to_cols_array_2d(),
            view_proj: (projection * view).to_cols_array_2d(),
            eye_direction: eye_direction.extend(0.0).to_array(),
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY, Vec3::NEG_Z)
    }
}
