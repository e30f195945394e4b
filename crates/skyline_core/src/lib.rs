//! Core types for the Skyline scene
//!
//! This crate provides the foundational types for building the scene:
//!
//! - [`Transform`] - Position, Euler rotation, and scale
//! - [`Material`] - Visual properties of a mesh
//! - [`MeshData`] - Procedurally generated triangle meshes
//! - [`Node`] - Group, mesh or light in the scene graph
//! - [`SceneGraph`] - Arena owning nodes, geometries and materials
//! - [`NodeKey`], [`GeometryKey`], [`MaterialKey`] - Generational keys into the arena

mod transform;
mod material;
mod geometry;
mod node;
mod scene_graph;

pub use transform::Transform;
pub use material::{Material, ShadingModel};
pub use geometry::MeshData;
pub use node::{Node, NodeFlags, NodeKind};
pub use scene_graph::{SceneGraph, NodeKey, GeometryKey, MaterialKey, DisposeReport, Drawable};

// Re-export commonly used types from skyline_math for convenience
pub use skyline_math::{Vec3, Mat4, Color, Hsl};
