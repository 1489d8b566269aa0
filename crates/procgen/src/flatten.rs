//! Flattening per-cube vertex arrays into one triangle list.

use engine_core::Vertex;

/// Concatenate cube vertex arrays in order. No deduplication and no index
/// buffer: every consecutive triple of the result is one triangle.
pub fn flatten<C: AsRef<[Vertex]>>(cubes: &[C]) -> Vec<Vertex> {
    let total = cubes.iter().map(|c| c.as_ref().len()).sum();
    let mut mesh = Vec::with_capacity(total);
    for cube in cubes {
        mesh.extend_from_slice(cube.as_ref());
    }
    mesh
}
