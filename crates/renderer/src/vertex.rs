//! Vertex types and layouts for rendering.

use bytemuck::{Pod, Zeroable};

/// GPU-side vertex: position, RGBA color and normal.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub normal: [f32; 3],
}

impl GpuVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Color
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // Normal
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 7]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Shape vertices carry no alpha; the effect renders them opaque.
impl From<&engine_core::Vertex> for GpuVertex {
    fn from(v: &engine_core::Vertex) -> Self {
        let [r, g, b] = v.color.to_array();
        Self {
            position: v.position.to_array(),
            color: [r, g, b, 1.0],
            normal: v.normal.to_array(),
        }
    }
}

/// Convert a flat shape mesh for upload.
pub fn to_gpu_vertices(mesh: &[engine_core::Vertex]) -> Vec<GpuVertex> {
    mesh.iter().map(GpuVertex::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{Color, Vertex};
    use glam::Vec3;

    #[test]
    fn layout_matches_struct() {
        let layout = GpuVertex::layout();
        assert_eq!(layout.array_stride, 40);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[2].offset, 28);
    }

    #[test]
    fn conversion_keeps_fields_and_is_opaque() {
        let v = Vertex::new(Vec3::new(1.0, 2.0, 3.0), Color::new(0.1, 0.2, 0.3), Vec3::NEG_Z);
        let gpu = GpuVertex::from(&v);
        assert_eq!(gpu.position, [1.0, 2.0, 3.0]);
        assert_eq!(gpu.color, [0.1, 0.2, 0.3, 1.0]);
        assert_eq!(gpu.normal, [0.0, 0.0, -1.0]);
    }
}
