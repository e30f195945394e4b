//! SceneBuilder - Declarative scene construction
//!
//! Provides a fluent API for building the static part of the city scene:
//! camera, lights, ground and environment.

use std::f32::consts::PI;

use skyline_core::{Color, Material, MeshData, Node, NodeFlags, NodeKey, NodeKind, SceneGraph, Transform, Vec3};
use skyline_render::{Environment, Fog, PerspectiveCamera};

use crate::config::AppConfig;
use crate::stage::{StageError, Viewport};

pub const TAG_GROUND: &str = "ground";
pub const TAG_LIGHT: &str = "light";

/// The static scene every stage starts from
pub struct BaseScene {
    pub graph: SceneGraph,
    pub camera: PerspectiveCamera,
    pub environment: Environment,
    pub ground: Option<NodeKey>,
}

/// Builder for constructing the base scene
///
/// # Example
/// ```ignore
/// let scene = SceneBuilder::new(camera)
///     .add_ambient_light(Color::WHITE, 0.6)
///     .add_directional_light(Color::WHITE, 0.8, Vec3::new(50.0, 50.0, 50.0), 2048)
///     .add_ground(200.0, Color::from_hex(0x555555))
///     .build();
/// ```
pub struct SceneBuilder {
    graph: SceneGraph,
    camera: PerspectiveCamera,
    environment: Environment,
    ground: Option<NodeKey>,
}

impl SceneBuilder {
    /// Create a new scene builder around a camera
    pub fn new(camera: PerspectiveCamera) -> Self {
        Self {
            graph: SceneGraph::new(),
            camera,
            environment: Environment::default(),
            ground: None,
        }
    }

    /// Set background, fog and shadow coverage
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Add a uniform ambient light
    pub fn add_ambient_light(mut self, color: Color, intensity: f32) -> Self {
        self.graph.add_node(
            Node::new(NodeKind::AmbientLight { color, intensity })
                .with_name("ambient_light")
                .with_tag(TAG_LIGHT),
        );
        self
    }

    /// Add a directional light at `position` shining towards the origin
    ///
    /// A `shadow_map_size` of 0 disables shadows.
    pub fn add_directional_light(mut self, color: Color, intensity: f32, position: Vec3, shadow_map_size: u32) -> Self {
        let flags = if shadow_map_size > 0 {
            NodeFlags::CAST_SHADOW
        } else {
            NodeFlags::empty()
        };
        self.graph.add_node(
            Node::new(NodeKind::DirectionalLight { color, intensity, shadow_map_size })
                .with_name("directional_light")
                .with_tag(TAG_LIGHT)
                .with_transform(Transform::from_position(position))
                .with_flags(flags),
        );
        self
    }

    /// Add a square ground plane lying in XZ
    pub fn add_ground(mut self, size: f32, color: Color) -> Self {
        let geometry = self.graph.add_geometry(MeshData::plane(size, size));
        let material = self.graph.add_material(Material::standard(color, 0.2, 0.8));
        let key = self.graph.add_node(
            Node::mesh(geometry, material)
                .with_name("ground")
                .with_tag(TAG_GROUND)
                .with_transform(Transform::identity().with_rotation(Vec3::new(-PI / 2.0, 0.0, 0.0)))
                .with_flags(NodeFlags::RECEIVE_SHADOW),
        );
        self.ground = Some(key);
        self
    }

    /// Build the scene
    pub fn build(self) -> BaseScene {
        BaseScene {
            graph: self.graph,
            camera: self.camera,
            environment: self.environment,
            ground: self.ground,
        }
    }
}

/// Build camera, lights, ground and environment for a viewport
pub fn build_base_scene(viewport: Viewport, config: &AppConfig) -> Result<BaseScene, StageError> {
    if viewport.is_empty() {
        return Err(StageError::SurfaceUnavailable {
            width: viewport.width,
            height: viewport.height,
        });
    }

    let cam = &config.camera;
    let mut camera = PerspectiveCamera::new(cam.fov, viewport.aspect(), cam.near, cam.far)
        .with_position(Vec3::from(cam.start_position));
    camera.look_at(Vec3::from(cam.target));

    let scene = &config.scene;
    let sky = Color::from_hex(scene.background_color);
    let environment = Environment {
        background: sky,
        fog: Some(Fog {
            color: sky,
            near: scene.fog_near,
            far: scene.fog_far,
        }),
        shadow_extent: config.rendering.shadow_extent,
    };

    let rendering = &config.rendering;
    Ok(SceneBuilder::new(camera)
        .with_environment(environment)
        .add_ambient_light(Color::WHITE, rendering.ambient_intensity)
        .add_directional_light(
            Color::WHITE,
            rendering.sun_intensity,
            Vec3::from(rendering.sun_position),
            rendering.shadow_map_size,
        )
        .add_ground(scene.ground_size, Color::from_hex(scene.ground_color))
        .build())
}
