//! Explicit lighting configuration passed to every frame.
//!
//! Three directional lights plus ambient and emissive terms. The shader
//! computes, per fragment:
//! `color * (ambient + emissive + sum(diffuse_i * max(n.l_i, 0))) + sum(specular_i * (n.h_i)^power)`.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

pub const MAX_LIGHTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub enabled: bool,
    pub diffuse: Vec3,
    pub specular: Vec3,
    /// Direction the light travels in.
    pub direction: Vec3,
}

impl DirectionalLight {
    pub fn new(diffuse: Vec3, specular: Vec3, direction: Vec3) -> Self {
        Self {
            enabled: true,
            diffuse,
            specular,
            direction,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingConfig {
    pub lights: [DirectionalLight; MAX_LIGHTS],
    pub ambient: Vec3,
    pub emissive: Vec3,
    pub specular_power: f32,
    pub alpha: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            lights: [
                DirectionalLight::new(Vec3::ONE, Vec3::splat(0.5), Vec3::NEG_X),
                DirectionalLight::new(Vec3::splat(0.5), Vec3::splat(0.5), Vec3::NEG_Y).disabled(),
                DirectionalLight::new(Vec3::splat(0.25), Vec3::splat(0.5), Vec3::NEG_Z),
            ],
            ambient: Vec3::splat(0.2),
            emissive: Vec3::splat(0.2),
            specular_power: 16.0,
            alpha: 1.0,
        }
    }
}

impl LightingConfig {
    /// No lights, full ambient: fragments keep their vertex color exactly.
    pub fn unlit() -> Self {
        let mut config = Self::default();
        for light in &mut config.lights {
            light.enabled = false;
        }
        config.ambient = Vec3::ONE;
        config.emissive = Vec3::ZERO;
        config
    }

    pub fn enabled_lights(&self) -> impl Iterator<Item = &DirectionalLight> {
        self.lights.iter().filter(|l| l.enabled)
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LightUniform {
    /// xyz = normalized travel direction, w = 1 when enabled.
    pub direction: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

/// Lighting uniform data for GPU (must match lit_color.wgsl Lighting).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LightingUniform {
    pub lights: [LightUniform; MAX_LIGHTS],
    /// rgb = ambient, w = alpha.
    pub ambient: [f32; 4],
    /// rgb = emissive, w = specular power.
    pub emissive: [f32; 4],
}

impl From<&LightingConfig> for LightingUniform {
    fn from(config: &LightingConfig) -> Self {
        let lights = config.lights.map(|l| LightUniform {
            direction: l
                .direction
                .normalize_or_zero()
                .extend(if l.enabled { 1.0 } else { 0.0 })
                .to_array(),
            diffuse: l.diffuse.extend(0.0).to_array(),
            specular: l.specular.extend(0.0).to_array(),
        });
        Self {
            lights,
            ambient: config.ambient.extend(config.alpha).to_array(),
            emissive: config.emissive.extend(config.specular_power).to_array(),
        }
    }
}
