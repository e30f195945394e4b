//! Procedural mesh data
//!
//! [`MeshData`] is an indexed triangle list with per-vertex normals. All
//! primitives are generated in local space, centred on the origin, with
//! counter-clockwise front faces.

use std::f32::consts::{PI, TAU};

use skyline_math::Vec3;

/// Indexed triangle mesh
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = Vec3::from(*self.positions.first()?);
        Some(self.positions.iter().fold((first, first), |(lo, hi), p| {
            (
                Vec3::new(lo.x.min(p[0]), lo.y.min(p[1]), lo.z.min(p[2])),
                Vec3::new(hi.x.max(p[0]), hi.y.max(p[1]), hi.z.max(p[2])),
            )
        }))
    }

    /// Box of the given full extents
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let mut mesh = Self::new();
        mesh.add_cuboid(Vec3::ZERO, Vec3::new(width / 2.0, height / 2.0, depth / 2.0));
        mesh
    }

    /// Flat rectangle in the XY plane facing +Z
    pub fn plane(width: f32, height: f32) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self {
            positions: vec![[-hw, hh, 0.0], [hw, hh, 0.0], [-hw, -hh, 0.0], [hw, -hh, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 4],
            indices: vec![0, 2, 1, 2, 3, 1],
        }
    }

    /// Capped cylinder (or truncated cone) along the Y axis
    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        let mut mesh = Self::new();
        let half_h = height / 2.0;
        let slope = (radius_bottom - radius_top) / height;
        let segments = radial_segments.max(3);

        // Torso: row 0 is the top ring, row 1 the bottom ring
        for (row, radius) in [(0.0f32, radius_top), (1.0f32, radius_bottom)] {
            let y = -row * height + half_h;
            for x in 0..=segments {
                let theta = x as f32 / segments as f32 * TAU;
                let (sin_t, cos_t) = theta.sin_cos();
                mesh.positions.push([radius * sin_t, y, radius * cos_t]);
                mesh.normals.push(Vec3::new(sin_t, slope, cos_t).normalized().to_array());
            }
        }

        let stride = segments + 1;
        for x in 0..segments {
            let a = x;
            let b = stride + x;
            let c = stride + x + 1;
            let d = x + 1;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }

        mesh.add_cap(half_h, radius_top, segments, true);
        mesh.add_cap(-half_h, radius_bottom, segments, false);
        mesh
    }

    /// Full UV sphere
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self::sphere_section(radius, width_segments, height_segments, 0.0, TAU, 0.0, PI)
    }

    /// Partial UV sphere
    ///
    /// `phi` sweeps around the Y axis, `theta` sweeps down from +Y. A
    /// `theta_length` of `PI / 2` gives an open hemisphere.
    pub fn sphere_section(
        radius: f32,
        width_segments: u32,
        height_segments: u32,
        phi_start: f32,
        phi_length: f32,
        theta_start: f32,
        theta_length: f32,
    ) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);
        let theta_end = (theta_start + theta_length).min(PI);
        let mut mesh = Self::new();

        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            let theta = theta_start + v * theta_length;
            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let phi = phi_start + u * phi_length;
                let n = Vec3::new(
                    -phi.cos() * theta.sin(),
                    theta.cos(),
                    phi.sin() * theta.sin(),
                );
                mesh.positions.push((n * radius).to_array());
                mesh.normals.push(n.normalized().to_array());
            }
        }

        let stride = ws + 1;
        for iy in 0..hs {
            for ix in 0..ws {
                let a = iy * stride + ix + 1;
                let b = iy * stride + ix;
                let c = (iy + 1) * stride + ix;
                let d = (iy + 1) * stride + ix + 1;
                if iy != 0 || theta_start > 0.0 {
                    mesh.indices.extend_from_slice(&[a, b, d]);
                }
                if iy != hs - 1 || theta_end < PI {
                    mesh.indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        mesh
    }

    /// Offset every vertex
    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.positions {
            p[0] += offset.x;
            p[1] += offset.y;
            p[2] += offset.z;
        }
    }

    /// Builder form of [`MeshData::translate`]
    pub fn translated(mut self, offset: Vec3) -> Self {
        self.translate(offset);
        self
    }

    /// Merge several meshes into one, re-basing indices
    pub fn merge<'a>(parts: impl IntoIterator<Item = &'a MeshData>) -> Self {
        let mut merged = Self::new();
        for part in parts {
            let base = merged.positions.len() as u32;
            merged.positions.extend_from_slice(&part.positions);
            merged.normals.extend_from_slice(&part.normals);
            merged.indices.extend(part.indices.iter().map(|i| i + base));
        }
        merged
    }

    fn add_cuboid(&mut self, center: Vec3, half: Vec3) {
        let (x0, x1) = (center.x - half.x, center.x + half.x);
        let (y0, y1) = (center.y - half.y, center.y + half.y);
        let (z0, z1) = (center.z - half.z, center.z + half.z);

        let faces: [([[f32; 3]; 4], [f32; 3]); 6] = [
            ([[x0, y0, z1], [x1, y0, z1], [x1, y1, z1], [x0, y1, z1]], [0.0, 0.0, 1.0]),
            ([[x1, y0, z0], [x0, y0, z0], [x0, y1, z0], [x1, y1, z0]], [0.0, 0.0, -1.0]),
            ([[x0, y1, z1], [x1, y1, z1], [x1, y1, z0], [x0, y1, z0]], [0.0, 1.0, 0.0]),
            ([[x0, y0, z0], [x1, y0, z0], [x1, y0, z1], [x0, y0, z1]], [0.0, -1.0, 0.0]),
            ([[x1, y0, z1], [x1, y0, z0], [x1, y1, z0], [x1, y1, z1]], [1.0, 0.0, 0.0]),
            ([[x0, y0, z0], [x0, y0, z1], [x0, y1, z1], [x0, y1, z0]], [-1.0, 0.0, 0.0]),
        ];

        for (corners, normal) in faces {
            let b = self.positions.len() as u32;
            self.positions.extend_from_slice(&corners);
            self.normals.extend_from_slice(&[normal; 4]);
            self.indices.extend_from_slice(&[b, b + 1, b + 2, b, b + 2, b + 3]);
        }
    }

    fn add_cap(&mut self, y: f32, radius: f32, segments: u32, top: bool) {
        let normal = if top { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };
        let center = self.positions.len() as u32;
        self.positions.push([0.0, y, 0.0]);
        self.normals.push(normal);

        for x in 0..=segments {
            let theta = x as f32 / segments as f32 * TAU;
            let (sin_t, cos_t) = theta.sin_cos();
            self.positions.push([radius * sin_t, y, radius * cos_t]);
            self.normals.push(normal);
        }

        for x in 0..segments {
            let v1 = center + 1 + x;
            let v2 = center + 2 + x;
            if top {
                self.indices.extend_from_slice(&[center, v1, v2]);
            } else {
                self.indices.extend_from_slice(&[center, v2, v1]);
            }
        }
    }
}
