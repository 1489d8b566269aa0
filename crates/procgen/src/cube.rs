//! Axis-aligned cube triangulation with flat per-face normals.
//!
//! A cube is 6 faces x 2 triangles x 3 vertices = 36 vertices. Faces are
//! emitted in [`CubeFace::ALL`] order. Each face quad `a b c d` is wound
//! counter-clockwise seen from outside and split into `(a, b, c)`, `(a, c, d)`.

use engine_core::{Color, Error, Position, Result, Vertex};
use glam::Vec3;

/// Vertices emitted per cube.
pub const CUBE_VERTEX_COUNT: usize = 36;

/// One face of an axis-aligned cube, named by its outward normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl CubeFace {
    /// Emission order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    pub fn normal(self) -> Vec3 {
        match self {
            CubeFace::PosX => Vec3::X,
            CubeFace::NegX => Vec3::NEG_X,
            CubeFace::PosY => Vec3::Y,
            CubeFace::NegY => Vec3::NEG_Y,
            CubeFace::PosZ => Vec3::Z,
            CubeFace::NegZ => Vec3::NEG_Z,
        }
    }

    /// Multiplier applied to the base color of every vertex on this face.
    /// Tunable; keeps faces distinguishable even where lighting is equal.
    pub fn shade(self) -> f32 {
        match self {
            CubeFace::PosX => 1.00,
            CubeFace::NegX => 0.90,
            CubeFace::PosY => 0.95,
            CubeFace::NegY => 0.85,
            CubeFace::PosZ => 1.05,
            CubeFace::NegZ => 0.80,
        }
    }

    /// Corner indices into [`corners`] in counter-clockwise order seen from outside.
    fn quad(self) -> [usize; 4] {
        // Corner index bits: x = bit 0, y = bit 1, z = bit 2 (1 = positive side).
        match self {
            CubeFace::PosX => [1, 3, 7, 5],
            CubeFace::NegX => [0, 4, 6, 2],
            CubeFace::PosY => [2, 6, 7, 3],
            CubeFace::NegY => [0, 1, 5, 4],
            CubeFace::PosZ => [4, 5, 7, 6],
            CubeFace::NegZ => [0, 2, 3, 1],
        }
    }
}

/// The 8 corners of the cube, indexed by sign bits (x = 1, y = 2, z = 4).
fn corners(center: Position, half: f32) -> [Position; 8] {
    std::array::from_fn(|i| {
        let sign = |bit: usize| if i & bit != 0 { half } else { -half };
        center + Vec3::new(sign(1), sign(2), sign(4))
    })
}

/// Build the 36 vertices of a cube centered at `center`.
pub fn build_cube(center: Position, edge_length: f32, base_color: Color) -> Result<Vec<Vertex>> {
    if !edge_length.is_finite() || edge_length <= 0.0 {
        return Err(Error::invalid_argument(format!(
            "cube edge length must be positive, got {edge_length}"
        )));
    }

    let corners = corners(center, edge_length * 0.5);
    let mut vertices = Vec::with_capacity(CUBE_VERTEX_COUNT);

    for face in CubeFace::ALL {
        let normal = face.normal();
        let color = base_color.scaled(face.shade());
        let [a, b, c, d] = face.quad().map(|i| corners[i]);
        for position in [a, b, c, a, c, d] {
            vertices.push(Vertex::new(position, color, normal));
        }
    }

    Ok(vertices)
}

/// Mean position of a vertex set (the cube center for a full cube).
pub fn centroid(vertices: &[Vertex]) -> Position {
    if vertices.is_empty() {
        return Position::ZERO;
    }
    let sum: Vec3 = vertices.iter().map(|v| v.position).sum();
    sum / vertices.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn face_vertices(cube: &[Vertex], face: usize) -> &[Vertex] {
        &cube[face * 6..face * 6 + 6]
    }

    #[test]
    fn cube_has_36_vertices() {
        for edge in [0.01, 1.0, 4.0, 250.0] {
            let cube = build_cube(Position::ZERO, edge, Color::GRAY).unwrap();
            assert_eq!(cube.len(), CUBE_VERTEX_COUNT);
        }
    }

    #[test]
    fn each_face_shares_one_distinct_axis_normal() {
        let cube = build_cube(Vec3::new(1.0, -2.0, 3.0), 2.0, Color::GRAY).unwrap();
        let mut seen = HashSet::new();
        for (i, face) in CubeFace::ALL.iter().enumerate() {
            let verts = face_vertices(&cube, i);
            assert!(verts.iter().all(|v| v.normal == face.normal()));
            assert!((face.normal().length() - 1.0).abs() < 1e-6);
            seen.insert(format!("{:?}", face.normal()));
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn face_vertices_lie_on_their_face_plane() {
        let center = Vec3::new(10.0, 0.0, -4.0);
        let edge = 3.0;
        let cube = build_cube(center, edge, Color::WHITE).unwrap();
        for (i, face) in CubeFace::ALL.iter().enumerate() {
            for v in face_vertices(&cube, i) {
                let offset = (v.position - center).dot(face.normal());
                assert!((offset - edge * 0.5).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn winding_is_counter_clockwise_from_outside() {
        let cube = build_cube(Position::ZERO, 1.0, Color::GRAY).unwrap();
        for tri in cube.chunks_exact(3) {
            let n = (tri[1].position - tri[0].position).cross(tri[2].position - tri[0].position);
            assert!(n.normalize().dot(tri[0].normal) > 0.999);
        }
    }

    #[test]
    fn face_colors_follow_shade_table() {
        let base = Color::new(0.5, 0.4, 0.2);
        let cube = build_cube(Position::ZERO, 1.0, base).unwrap();
        for (i, face) in CubeFace::ALL.iter().enumerate() {
            let expected = base.scaled(face.shade());
            assert!(face_vertices(&cube, i).iter().all(|v| v.color == expected));
        }
    }

    #[test]
    fn centroid_is_cube_center() {
        let center = Vec3::new(-3.0, 7.5, 2.0);
        let cube = build_cube(center, 4.0, Color::GRAY).unwrap();
        assert!((centroid(&cube) - center).length() < 1e-5);
    }

    #[test]
    fn rejects_non_positive_edge() {
        for edge in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let err = build_cube(Position::ZERO, edge, Color::GRAY).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)));
        }
    }
}
