//! Cluster layout: cubes stacked along +Z.
//!
//! Cube `i` sits `i * edge_length` above the origin. The stacking axis is the
//! camera's up vector, so the stack reads as a vertical column on screen.

use crate::cube::build_cube;
use engine_core::{Color, Error, Position, Result, Vertex};
use glam::Vec3;

/// Edge length of every cube in the stack. The camera framing derives from
/// the same value.
pub const CUBE_EDGE: f32 = 4.0;

/// Stacking axis.
pub const STACK_AXIS: Vec3 = Vec3::Z;

/// Per-level darkening: level `i` is shaded by `1 - LEVEL_DARKEN * i`.
pub const LEVEL_DARKEN: f32 = 0.04;

/// Lower bound on the per-level shade so tall stacks never go black.
pub const LEVEL_MIN_SHADE: f32 = 0.5;

/// Declarative description of a vertical stack of cubes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackLayout {
    pub origin: Position,
    pub count: i32,
    pub edge_length: f32,
    pub base_color: Color,
}

impl StackLayout {
    pub fn new(origin: Position, count: i32, base_color: Color) -> Self {
        Self {
            origin,
            count,
            edge_length: CUBE_EDGE,
            base_color,
        }
    }

    pub fn with_edge_length(mut self, edge_length: f32) -> Self {
        self.edge_length = edge_length;
        self
    }

    /// Center of cube `index`.
    pub fn cube_center(&self, index: usize) -> Position {
        self.origin + STACK_AXIS * (index as f32 * self.edge_length)
    }

    /// Geometric center of the whole stack (the origin for zero or one cube).
    pub fn center(&self) -> Position {
        let levels = self.count.max(1) - 1;
        self.origin + STACK_AXIS * (levels as f32 * self.edge_length * 0.5)
    }

    /// Color of the cube at `index`.
    pub fn level_color(&self, index: usize) -> Color {
        let shade = (1.0 - LEVEL_DARKEN * index as f32).max(LEVEL_MIN_SHADE);
        self.base_color.scaled(shade)
    }

    /// Generate one 36-vertex array per cube, bottom to top.
    pub fn build(&self) -> Result<Vec<Vec<Vertex>>> {
        if self.count < 0 {
            return Err(Error::invalid_argument(format!(
                "cube count must not be negative, got {}",
                self.count
            )));
        }
        let count = self.count as usize;
        let cubes = (0..count)
            .map(|i| build_cube(self.cube_center(i), self.edge_length, self.level_color(i)))
            .collect::<Result<Vec<_>>>()?;
        log::debug!("Built stack of {} cubes at {:?}", cubes.len(), self.origin);
        Ok(cubes)
    }
}

/// Stack `count` cubes of edge [`CUBE_EDGE`] upward from `origin`.
pub fn build_stack(origin: Position, count: i32, base_color: Color) -> Result<Vec<Vec<Vertex>>> {
    StackLayout::new(origin, count, base_color).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::{centroid, CUBE_VERTEX_COUNT};

    #[test]
    fn stack_has_count_cubes_of_36() {
        for count in [0, 1, 2, 8, 20] {
            let cubes = build_stack(Position::ZERO, count, Color::GRAY).unwrap();
            assert_eq!(cubes.len(), count as usize);
            assert!(cubes.iter().all(|c| c.len() == CUBE_VERTEX_COUNT));
        }
    }

    #[test]
    fn consecutive_centroids_step_one_edge_up() {
        let origin = Vec3::new(2.0, -1.0, 5.0);
        let cubes = build_stack(origin, 6, Color::GRAY).unwrap();
        for pair in cubes.windows(2) {
            let step = centroid(&pair[1]) - centroid(&pair[0]);
            assert!((step - STACK_AXIS * CUBE_EDGE).length() < 1e-4);
        }
        assert!((centroid(&cubes[0]) - origin).length() < 1e-5);
    }

    #[test]
    fn zero_count_is_empty_and_negative_is_rejected() {
        assert!(build_stack(Position::ZERO, 0, Color::GRAY).unwrap().is_empty());
        let err = build_stack(Position::ZERO, -1, Color::GRAY).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn invalid_edge_length_propagates() {
        let layout = StackLayout::new(Position::ZERO, 3, Color::GRAY).with_edge_length(0.0);
        assert!(matches!(layout.build(), Err(Error::InvalidArgument(_))));
        // Nothing to build means nothing to validate.
        let empty = StackLayout::new(Position::ZERO, 0, Color::GRAY).with_edge_length(0.0);
        assert!(empty.build().unwrap().is_empty());
    }

    /// Same arguments must produce identical vertices.
    #[test]
    fn build_is_deterministic() {
        let a = build_stack(Vec3::new(1.0, 2.0, 3.0), 8, Color::GRAY).unwrap();
        let b = build_stack(Vec3::new(1.0, 2.0, 3.0), 8, Color::GRAY).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn levels_darken_with_height_down_to_floor() {
        let layout = StackLayout::new(Position::ZERO, 30, Color::WHITE);
        assert_eq!(layout.level_color(0), Color::WHITE);
        assert!(layout.level_color(1).r < layout.level_color(0).r);
        assert_eq!(layout.level_color(29), Color::WHITE.scaled(LEVEL_MIN_SHADE));
    }

    #[test]
    fn center_is_midpoint_of_stack() {
        let layout = StackLayout::new(Position::ZERO, 8, Color::GRAY);
        assert!((layout.center() - Vec3::new(0.0, 0.0, 14.0)).length() < 1e-5);
        assert_eq!(StackLayout::new(Position::ZERO, 0, Color::GRAY).center(), Position::ZERO);
        assert_eq!(StackLayout::new(Position::ZERO, 1, Color::GRAY).center(), Position::ZERO);
    }
}
