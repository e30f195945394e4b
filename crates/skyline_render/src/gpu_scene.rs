//! GPU-side copies of scene geometry
//!
//! Geometry is uploaded lazily the first time a mesh is drawn and kept until
//! it is released. Per-frame instance data lives in one growable buffer.

use slotmap::SecondaryMap;
use wgpu::util::DeviceExt;
use skyline_core::{GeometryKey, MeshData, SceneGraph};

use crate::pipeline::{InstanceRaw, Vertex, INITIAL_INSTANCE_CAPACITY};
use crate::renderer::DrawItem;

/// Vertex and index buffers of one geometry
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    /// Upload a mesh
    pub fn upload(device: &wgpu::Device, mesh: &MeshData) -> Self {
        let vertices = interleave(mesh);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    fn destroy(self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}

/// Pair positions with normals in GPU layout
pub fn interleave(mesh: &MeshData) -> Vec<Vertex> {
    mesh.positions
        .iter()
        .zip(mesh.normals.iter())
        .map(|(p, n)| Vertex::new(*p, *n))
        .collect()
}

/// GPU buffers for everything the scene draws
pub struct GpuScene {
    meshes: SecondaryMap<GeometryKey, GpuMesh>,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
}

impl GpuScene {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            meshes: SecondaryMap::new(),
            instance_buffer: Self::create_instance_buffer(device, INITIAL_INSTANCE_CAPACITY),
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
        }
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (capacity * std::mem::size_of::<InstanceRaw>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Upload any geometry in `keys` that is not on the GPU yet
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        graph: &SceneGraph,
        keys: impl IntoIterator<Item = GeometryKey>,
    ) {
        for key in keys {
            if self.meshes.contains_key(key) {
                continue;
            }
            match graph.geometry(key) {
                Some(mesh) if mesh.triangle_count() > 0 => {
                    self.meshes.insert(key, GpuMesh::upload(device, mesh));
                }
                _ => log::trace!("Skipping upload of empty geometry {:?}", key),
            }
        }
    }

    /// Write this frame's instances, growing the buffer if needed
    pub fn write_instances(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, instances: &[InstanceRaw]) {
        if instances.len() > self.instance_capacity {
            let capacity = instances.len().next_power_of_two();
            log::debug!("Growing instance buffer {} -> {}", self.instance_capacity, capacity);
            self.instance_buffer.destroy();
            self.instance_buffer = Self::create_instance_buffer(device, capacity);
            self.instance_capacity = capacity;
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(instances));
        }
    }

    /// Issue one indexed draw per item
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, items: &[DrawItem]) {
        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        for item in items {
            let Some(mesh) = self.meshes.get(item.geometry) else { continue };
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, item.instance..item.instance + 1);
        }
    }

    /// Free the GPU buffers of the given geometries
    ///
    /// Returns how many were actually resident.
    pub fn release(&mut self, keys: &[GeometryKey]) -> usize {
        let mut released = 0;
        for &key in keys {
            if let Some(mesh) = self.meshes.remove(key) {
                mesh.destroy();
                released += 1;
            }
        }
        released
    }

    /// Free every GPU buffer
    pub fn release_all(&mut self) -> usize {
        let keys: Vec<GeometryKey> = self.meshes.keys().collect();
        let released = self.release(&keys);
        self.instance_buffer.destroy();
        self.instance_capacity = 0;
        released
    }
}
