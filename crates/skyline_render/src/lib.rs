//! Skyline Rendering Library
//!
//! This crate provides the wgpu-based rendering pipeline for the scene:
//! a depth-only shadow pass followed by a lit mesh pass with fog.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`camera::PerspectiveCamera`] - Perspective camera driven by orbit controls
//! - [`pipeline::MeshPipeline`] - Lit opaque + transparent mesh rendering
//! - [`pipeline::ShadowPipeline`] - Directional light shadow map
//! - [`gpu_scene::GpuScene`] - GPU buffers for scene geometry and instances
//! - [`renderer::SceneRenderer`] - The seam the stage draws through

pub mod context;
pub mod camera;
pub mod pipeline;
pub mod gpu_scene;
pub mod renderer;

pub use context::{RenderContext, ContextError};
pub use camera::PerspectiveCamera;
pub use gpu_scene::GpuScene;
pub use renderer::{
    SceneRenderer, RenderError, Environment, Fog, Lighting, SunLight, FramePlan, DrawItem,
    scene_uniforms, light_view_projection,
};

// Re-export core types for convenience
pub use skyline_core::{SceneGraph, GeometryKey, MaterialKey, NodeKey};
