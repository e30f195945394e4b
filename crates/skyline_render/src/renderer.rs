//! Renderer seam and frame planning
//!
//! [`SceneRenderer`] is what the stage talks to. Everything that can be
//! decided without a GPU (light extraction, draw ordering, uniform values)
//! lives here as plain functions so it can be tested headless.

use skyline_core::{GeometryKey, NodeKind, SceneGraph};
use skyline_math::{mat4, Color, Mat4, Vec3};

use crate::camera::PerspectiveCamera;
use crate::pipeline::{InstanceRaw, SceneUniforms};

/// Render error types
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Surface was lost (window resized, minimized, etc.)
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface error
    Other(String),
}

impl RenderError {
    /// Errors after which the frame loop cannot continue
    pub fn is_fatal(&self) -> bool {
        matches!(self, RenderError::OutOfMemory)
    }
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(e: wgpu::SurfaceError) -> Self {
        match e {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => RenderError::SurfaceLost,
            wgpu::SurfaceError::OutOfMemory => RenderError::OutOfMemory,
            other => RenderError::Other(format!("{:?}", other)),
        }
    }
}

/// Linear distance fog
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

/// Scene-wide drawing settings that are not nodes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Environment {
    /// Clear colour
    pub background: Color,
    pub fog: Option<Fog>,
    /// Half-size of the square area covered by the shadow map
    pub shadow_extent: f32,
}

impl Default for Environment {
    fn default() -> Self {
        let sky = Color::from_hex(0x87ceeb);
        Self {
            background: sky,
            fog: Some(Fog { color: sky, near: 1.0, far: 100.0 }),
            shadow_extent: 100.0,
        }
    }
}

/// Directional light in world space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunLight {
    pub position: Vec3,
    /// Unit vector pointing towards the light
    pub direction: Vec3,
    pub color: Color,
    pub intensity: f32,
    pub shadow_map_size: u32,
}

/// Lights gathered from the scene graph
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Lighting {
    /// Sum of ambient lights, premultiplied by intensity
    pub ambient: [f32; 3],
    /// First visible directional light
    pub sun: Option<SunLight>,
}

impl Lighting {
    pub fn from_graph(graph: &SceneGraph) -> Self {
        let mut lighting = Lighting::default();
        graph.traverse(|_, node, world| match node.kind {
            NodeKind::AmbientLight { color, intensity } => {
                lighting.ambient[0] += color.r * intensity;
                lighting.ambient[1] += color.g * intensity;
                lighting.ambient[2] += color.b * intensity;
            }
            NodeKind::DirectionalLight { color, intensity, shadow_map_size } if lighting.sun.is_none() => {
                let position = mat4::transform_point(world, Vec3::ZERO);
                // Shines towards the world origin
                let direction = if position.length_squared() > 0.0 {
                    position.normalized()
                } else {
                    Vec3::Y
                };
                lighting.sun = Some(SunLight {
                    position,
                    direction,
                    color,
                    intensity,
                    shadow_map_size,
                });
            }
            _ => {}
        });
        lighting
    }

    /// True if a directional light casts shadows
    pub fn has_shadows(&self) -> bool {
        self.sun.map_or(false, |s| s.shadow_map_size > 0)
    }
}

/// One draw call: a geometry and its slot in the instance buffer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawItem {
    pub geometry: GeometryKey,
    pub instance: u32,
}

/// Everything needed to record one frame
#[derive(Clone, Debug, Default)]
pub struct FramePlan {
    pub instances: Vec<InstanceRaw>,
    pub opaque: Vec<DrawItem>,
    /// Sorted back-to-front from the camera
    pub transparent: Vec<DrawItem>,
    pub shadow_casters: Vec<DrawItem>,
}

impl FramePlan {
    pub fn build(graph: &SceneGraph, camera_position: Vec3) -> Self {
        let mut plan = FramePlan::default();
        let mut transparent: Vec<(f32, DrawItem)> = Vec::new();

        for drawable in graph.drawables() {
            let Some(material) = graph.material(drawable.material) else {
                log::warn!("Mesh {:?} references a missing material", drawable.node);
                continue;
            };
            let item = DrawItem {
                geometry: drawable.geometry,
                instance: plan.instances.len() as u32,
            };
            plan.instances.push(InstanceRaw::new(drawable.world, material, drawable.receive_shadow));

            if material.transparent {
                let center = mat4::transform_point(drawable.world, Vec3::ZERO);
                transparent.push(((center - camera_position).length_squared(), item));
            } else {
                plan.opaque.push(item);
            }
            if drawable.cast_shadow {
                plan.shadow_casters.push(item);
            }
        }

        transparent.sort_by(|a, b| b.0.total_cmp(&a.0));
        plan.transparent = transparent.into_iter().map(|(_, item)| item).collect();
        plan
    }

    /// Distinct geometries referenced by this frame
    pub fn geometries(&self) -> Vec<GeometryKey> {
        let mut keys: Vec<GeometryKey> = Vec::new();
        for item in self.opaque.iter().chain(&self.transparent) {
            if !keys.contains(&item.geometry) {
                keys.push(item.geometry);
            }
        }
        keys
    }

    pub fn draw_count(&self) -> usize {
        self.opaque.len() + self.transparent.len()
    }
}

/// Orthographic light projection covering `extent` around `center`
pub fn light_view_projection(sun: &SunLight, center: Vec3, extent: f32) -> Mat4 {
    let extent = extent.max(1.0);
    let eye = center + sun.direction * (extent * 2.0);
    // look_at degenerates when the light is straight overhead
    let up = if sun.direction.cross(Vec3::Y).length_squared() < 1e-6 { Vec3::Z } else { Vec3::Y };
    let view = mat4::look_at(eye, center, up);
    let proj = mat4::orthographic(-extent, extent, -extent, extent, 0.1, extent * 4.0);
    mat4::mul(proj, view)
}

/// Per-frame uniform values
pub fn scene_uniforms(camera: &PerspectiveCamera, lighting: &Lighting, environment: &Environment) -> SceneUniforms {
    let mut uniforms = SceneUniforms {
        view_proj: camera.view_projection(),
        camera_pos: [camera.position.x, camera.position.y, camera.position.z, 1.0],
        ambient: [lighting.ambient[0], lighting.ambient[1], lighting.ambient[2], 0.0],
        ..SceneUniforms::default()
    };

    if let Some(sun) = lighting.sun {
        let center = Vec3::new(camera.target.x, 0.0, camera.target.z);
        uniforms.light_view_proj = light_view_projection(&sun, center, environment.shadow_extent);
        uniforms.light_dir = [sun.direction.x, sun.direction.y, sun.direction.z, sun.intensity];
        uniforms.light_color = sun.color.with_alpha(if sun.shadow_map_size > 0 { 1.0 } else { 0.0 });
        uniforms.fog_params[3] = 1.0 / sun.shadow_map_size.max(1) as f32;
    } else {
        uniforms.light_dir[3] = 0.0;
    }

    if let Some(fog) = environment.fog {
        uniforms.fog_color = fog.color.with_alpha(1.0);
        uniforms.fog_params[0] = fog.near;
        uniforms.fog_params[1] = fog.far;
        uniforms.fog_params[2] = 1.0;
    }

    uniforms
}

/// Draws a scene graph
///
/// The stage owns one renderer for its lifetime. `detach` is called once at
/// unmount; afterwards the renderer must not touch the surface again.
pub trait SceneRenderer {
    /// Draw one frame
    fn render(
        &mut self,
        graph: &SceneGraph,
        camera: &PerspectiveCamera,
        environment: &Environment,
    ) -> Result<(), RenderError>;
    /// Match the drawing surface to a new size in pixels
    fn resize(&mut self, width: u32, height: u32);
    /// Free GPU copies of disposed geometry, returning how many were resident
    fn release(&mut self, geometries: &[GeometryKey]) -> usize;
    /// Detach from the drawing surface
    fn detach(&mut self);
}
