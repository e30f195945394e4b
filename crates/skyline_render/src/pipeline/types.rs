//! GPU-compatible data types for the mesh and shadow pipelines
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};
use skyline_core::{Material, ShadingModel};
use skyline_math::{mat4, Mat4};

/// A mesh vertex: position and normal in local space
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// Per-draw instance data
///
/// Layout: 96 bytes (must match InstanceInput in mesh.wgsl / shadow.wgsl)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    /// Local to world matrix (64 bytes)
    pub model: [[f32; 4]; 4],
    /// Linear RGB + alpha (16 bytes)
    pub color: [f32; 4],
    /// shininess, flat shading (0/1), receive shadow (0/1), specular strength
    pub params: [f32; 4],
}

impl Default for InstanceRaw {
    fn default() -> Self {
        Self {
            model: mat4::IDENTITY,
            color: [1.0; 4],
            params: [30.0, 0.0, 0.0, 0.0],
        }
    }
}

impl InstanceRaw {
    /// Build the instance record for a mesh drawn with `material`
    pub fn new(model: Mat4, material: &Material, receive_shadow: bool) -> Self {
        // Metals reflect most light specularly, so their diffuse term fades
        let diffuse = match material.shading {
            ShadingModel::Phong => 1.0,
            ShadingModel::Standard => 1.0 - 0.5 * material.metalness,
        };
        Self {
            model,
            color: material.color.scaled(diffuse).with_alpha(material.alpha()),
            params: [
                material.shininess(),
                if material.flat_shading { 1.0 } else { 0.0 },
                if receive_shadow { 1.0 } else { 0.0 },
                specular_strength(material),
            ],
        }
    }
}

fn specular_strength(material: &Material) -> f32 {
    match material.shading {
        // Phong default specular colour is a dark grey
        ShadingModel::Phong => 0.07,
        ShadingModel::Standard => {
            let f0 = 0.04 + (1.0 - 0.04) * material.metalness;
            f0 * (1.0 - material.roughness).powi(2)
        }
    }
}

/// Per-frame scene uniforms
///
/// Layout: 224 bytes (must match SceneUniforms in mesh.wgsl / shadow.wgsl)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SceneUniforms {
    /// Camera projection * view (64 bytes)
    pub view_proj: [[f32; 4]; 4],
    /// Light projection * view for the shadow map (64 bytes)
    pub light_view_proj: [[f32; 4]; 4],
    /// Camera world position, w unused
    pub camera_pos: [f32; 4],
    /// Direction towards the light (xyz), intensity (w)
    pub light_dir: [f32; 4],
    /// Light colour (rgb), shadows enabled (w, 0/1)
    pub light_color: [f32; 4],
    /// Ambient colour premultiplied by intensity (rgb), w unused
    pub ambient: [f32; 4],
    /// Fog colour (rgb), w unused
    pub fog_color: [f32; 4],
    /// Fog near, fog far, fog enabled (0/1), shadow map texel size
    pub fog_params: [f32; 4],
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self {
            view_proj: mat4::IDENTITY,
            light_view_proj: mat4::IDENTITY,
            camera_pos: [0.0, 0.0, 0.0, 1.0],
            light_dir: [0.0, 1.0, 0.0, 0.0],
            light_color: [1.0, 1.0, 1.0, 0.0],
            ambient: [0.0; 4],
            fog_color: [0.0; 4],
            fog_params: [1.0, 100.0, 0.0, 1.0 / 2048.0],
        }
    }
}

/// Maximum instances written per frame before the buffer grows
pub const INITIAL_INSTANCE_CAPACITY: usize = 512;

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;
    use skyline_math::Color;

    #[test]
    fn test_vertex_size() {
        // 3 floats position + 3 floats normal = 24 bytes
        assert_eq!(size_of::<Vertex>(), 24);
    }

    #[test]
    fn test_instance_raw_size() {
        // 16 floats model + 4 floats color + 4 floats params = 96 bytes
        assert_eq!(size_of::<InstanceRaw>(), 96);
    }

    #[test]
    fn test_scene_uniforms_size() {
        // 2 matrices + 6 vec4 = 56 floats = 224 bytes, a multiple of 16
        assert_eq!(size_of::<SceneUniforms>(), 224);
        assert_eq!(size_of::<SceneUniforms>() % 16, 0);
    }

    #[test]
    fn test_alignment() {
        assert_eq!(std::mem::align_of::<Vertex>(), 4);
        assert_eq!(std::mem::align_of::<InstanceRaw>(), 4);
        assert_eq!(std::mem::align_of::<SceneUniforms>(), 4);
    }

    #[test]
    fn test_instance_from_transparent_material() {
        let material = Material::phong(Color::WHITE).with_opacity(0.8).with_flat_shading();
        let raw = InstanceRaw::new(mat4::IDENTITY, &material, false);
        assert_eq!(raw.color[3], 0.8);
        assert_eq!(raw.params[1], 1.0);
        assert_eq!(raw.params[2], 0.0);
    }

    #[test]
    fn test_metal_is_more_specular_than_rough_ground() {
        let metal = Material::standard(Color::WHITE, 0.8, 0.3);
        let ground = Material::standard(Color::WHITE, 0.2, 0.8);
        let a = InstanceRaw::new(mat4::IDENTITY, &metal, true);
        let b = InstanceRaw::new(mat4::IDENTITY, &ground, true);
        assert!(a.params[3] > b.params[3]);
        assert!(a.color[0] < b.color[0]);
    }
}
