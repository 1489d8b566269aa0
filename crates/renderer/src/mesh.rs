//! GPU vertex buffer for the unindexed triangle list.

use crate::vertex::GpuVertex;
use engine_core::{Error, Result};
use wgpu::util::DeviceExt;

/// An uploaded, read-only triangle list. An empty mesh owns no buffer.
pub struct Mesh {
    pub vertex_buffer: Option<wgpu::Buffer>,
    pub num_vertices: u32,
}

impl Mesh {
    /// Upload `vertices` once. Fails if the device cannot hold the buffer.
    pub fn new(device: &wgpu::Device, vertices: &[GpuVertex]) -> Result<Self> {
        if vertices.is_empty() {
            return Ok(Self {
                vertex_buffer: None,
                num_vertices: 0,
            });
        }

        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        let max = device.limits().max_buffer_size;
        if bytes.len() as u64 > max {
            return Err(Error::resource_creation(format!(
                "vertex buffer of {} bytes exceeds device limit {}",
                bytes.len(),
                max
            )));
        }
        let num_vertices = u32::try_from(vertices.len())
            .map_err(|_| Error::resource_creation("vertex count does not fit in u32"))?;

        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Stack Vertex Buffer"),
            contents: bytes,
            usage: wgpu::BufferUsages::VERTEX,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(Error::resource_creation(err.to_string()));
        }

        Ok(Self {
            vertex_buffer: Some(vertex_buffer),
            num_vertices,
        })
    }
}
