//! Procedural generation of the cube cluster mesh.

pub mod cluster;
pub mod cube;
pub mod flatten;

pub use cluster::*;
pub use cube::*;
pub use flatten::*;
