//! Shape model: the plain vertex records produced by mesh generation.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// A point in world space.
pub type Position = Vec3;

/// Linear RGB color with channels in `0.0..=1.0`. No alpha.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// 128/255 on every channel.
    pub const GRAY: Color = Color::new(128.0 / 255.0, 128.0 / 255.0, 128.0 / 255.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Multiply every channel by `factor`, clamped back into `0.0..=1.0`.
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(
            (self.r * factor).clamp(0.0, 1.0),
            (self.g * factor).clamp(0.0, 1.0),
            (self.b * factor).clamp(0.0, 1.0),
        )
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Quantize to 8-bit channels the way a unorm render target stores them.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}

impl From<[f32; 3]> for Color {
    fn from(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

/// One renderable vertex: position, color and unit normal.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Position,
    pub color: Color,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Position, color: Color, normal: Vec3) -> Self {
        Self { position, color, normal }
    }
}
