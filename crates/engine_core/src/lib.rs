//! Core types shared by the CubeArt crates.
//!
//! This crate provides the foundational types used across the workspace:
//! - The shape model (positions, colors, vertices)
//! - The error taxonomy
//! - Frame time management

pub mod error;
pub mod shape;
pub mod time;

pub use error::*;
pub use shape::*;
pub use time::*;

// Re-export commonly used types
pub use glam::{Mat4, Vec3};
