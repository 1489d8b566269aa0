//! Rendering system using wgpu for CubeArt.

pub mod camera;
pub mod capture;
pub mod device;
pub mod lighting;
pub mod mesh;
pub mod pipeline;
pub mod render_loop;
pub mod renderer;
pub mod texture;
pub mod vertex;

pub use camera::*;
pub use capture::*;
pub use device::*;
pub use lighting::*;
pub use mesh::*;
pub use pipeline::*;
pub use render_loop::*;
pub use renderer::*;
pub use texture::*;
pub use vertex::*;
