//! Rendering pipeline components
//!
//! A depth-only shadow pass followed by the lit mesh pass. Both share the
//! same vertex + instance buffer layouts and the scene uniform buffer.

pub mod types;
pub mod shadow_pipeline;
pub mod mesh_pipeline;

// Re-export types
pub use types::{Vertex, InstanceRaw, SceneUniforms, INITIAL_INSTANCE_CAPACITY};

// Re-export pipelines
pub use shadow_pipeline::{ShadowPipeline, SHADOW_FORMAT};
pub use mesh_pipeline::{MeshPipeline, DEPTH_FORMAT};

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
    // position: vec3<f32>
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    // normal: vec3<f32>
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: 12,
        shader_location: 1,
    },
];

// model columns, color, params
const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
    2 => Float32x4,
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
    6 => Float32x4,
    7 => Float32x4,
];

/// Vertex buffer layouts: slot 0 per-vertex, slot 1 per-instance
pub fn vertex_buffer_layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
    [
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &VERTEX_ATTRIBUTES,
        },
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &INSTANCE_ATTRIBUTES,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_buffer_layout_strides() {
        let [vertex, instance] = vertex_buffer_layouts();
        assert_eq!(vertex.array_stride, std::mem::size_of::<Vertex>() as u64);
        assert_eq!(instance.array_stride, std::mem::size_of::<InstanceRaw>() as u64);
    }

    #[test]
    fn test_instance_attributes_cover_struct() {
        let last = INSTANCE_ATTRIBUTES[5];
        assert_eq!(last.offset + 16, std::mem::size_of::<InstanceRaw>() as u64);
        assert_eq!(last.shader_location, 7);
    }
}
