//! Procedural population of the city
//!
//! The populator fills a [`SceneGraph`] with city blocks of buildings, clouds
//! and airplanes. All randomness comes from an injected [`rand::Rng`], so a
//! seeded populator always produces the same city.

use std::f32::consts::{PI, TAU};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skyline_core::{
    Color, Hsl, Material, MeshData, Node, NodeFlags, NodeKey, SceneGraph, Transform, Vec3,
};

use crate::config::SceneConfig;

/// Grid origins of the nine city blocks: centre, then edges, then corners
pub const BLOCK_OFFSETS: [(f32, f32); 9] = [
    (0.0, 0.0),
    (40.0, 0.0),
    (-40.0, 0.0),
    (0.0, 40.0),
    (0.0, -40.0),
    (40.0, 40.0),
    (-40.0, -40.0),
    (40.0, -40.0),
    (-40.0, 40.0),
];

pub const TAG_BUILDING: &str = "building";
pub const TAG_CITY_BLOCK: &str = "city_block";
pub const TAG_CLOUD: &str = "cloud";
pub const TAG_AIRPLANE: &str = "airplane";

const BUILDING_SATURATION: f32 = 0.7;
const BUILDING_LIGHTNESS: f32 = 0.6;

/// Parameters a building was generated with
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildingSpec {
    pub height: f32,
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    /// Centre of the box, relative to its block group
    pub position: Vec3,
}

impl BuildingSpec {
    pub fn color(&self) -> Color {
        Color::from_hsl(Hsl::new(self.hue, self.saturation, self.lightness))
    }
}

/// A group of buildings that is recycled as a unit
#[derive(Clone, Debug)]
pub struct CityBlock {
    pub node: NodeKey,
    /// Grid origin `(x, z)` the block was generated around
    pub origin: (f32, f32),
    pub buildings: Vec<BuildingSpec>,
}

/// A cluster of merged spheres
#[derive(Clone, Copy, Debug)]
pub struct Cloud {
    pub node: NodeKey,
    pub sphere_count: usize,
}

/// An airplane group and its parts
#[derive(Clone, Copy, Debug)]
pub struct Airplane {
    pub node: NodeKey,
    pub body: NodeKey,
    pub cockpit: NodeKey,
}

/// Everything the populator added
#[derive(Clone, Debug, Default)]
pub struct Population {
    pub city_blocks: Vec<CityBlock>,
    pub clouds: Vec<Cloud>,
    pub airplanes: Vec<Airplane>,
}

impl Population {
    pub fn building_count(&self) -> usize {
        self.city_blocks.iter().map(|b| b.buildings.len()).sum()
    }
}

/// Generates buildings, blocks, clouds and airplanes
pub struct Populator<R: Rng> {
    rng: R,
    config: SceneConfig,
}

impl Populator<StdRng> {
    /// Reproducible populator
    pub fn from_seed(seed: u64, config: SceneConfig) -> Self {
        Self::new(StdRng::seed_from_u64(seed), config)
    }

    /// Populator seeded from system entropy
    pub fn from_entropy(config: SceneConfig) -> Self {
        Self::new(StdRng::from_entropy(), config)
    }

    /// Seeded if the configuration names a seed, otherwise from entropy
    pub fn from_config(config: &SceneConfig) -> Self {
        match config.seed {
            Some(seed) => {
                log::info!("Populating with seed {}", seed);
                Self::from_seed(seed, config.clone())
            }
            None => Self::from_entropy(config.clone()),
        }
    }
}

impl<R: Rng> Populator<R> {
    pub fn new(rng: R, config: SceneConfig) -> Self {
        Self { rng, config }
    }

    fn unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Uniform in `[-scale/2, scale/2)`
    fn centred(&mut self, scale: f32) -> f32 {
        (self.unit() - 0.5) * scale
    }

    /// Lattice coordinates inside a block, bounds inclusive
    pub fn lattice(&self) -> Vec<f32> {
        let half = self.config.block_size / 2.0;
        let step = self.config.lattice_step.max(f32::EPSILON);
        let cells = (self.config.block_size / step).floor() as usize;
        (0..=cells).map(|i| -half + i as f32 * step).collect()
    }

    /// Roll a building for lattice site `(x, z)` of the block at `(ox, oz)`
    pub fn building_spec(&mut self, x: f32, z: f32, ox: f32, oz: f32) -> BuildingSpec {
        let height = self.unit() * self.config.building_height_range + self.config.building_min_height;
        let hue = self.unit();
        BuildingSpec {
            height,
            hue,
            saturation: BUILDING_SATURATION,
            lightness: BUILDING_LIGHTNESS,
            position: Vec3::new(x + ox, height / 2.0, z + oz),
        }
    }

    /// Add one building mesh under `parent`
    pub fn add_building(&mut self, graph: &mut SceneGraph, parent: NodeKey, spec: &BuildingSpec) -> NodeKey {
        let width = self.config.building_width;
        let geometry = graph.add_geometry(MeshData::cuboid(width, spec.height, width));
        let material = graph.add_material(Material::phong(spec.color()).with_flat_shading());
        graph.add_child(
            parent,
            Node::mesh(geometry, material)
                .with_tag(TAG_BUILDING)
                .with_transform(Transform::from_position(spec.position))
                .with_flags(NodeFlags::CAST_SHADOW | NodeFlags::RECEIVE_SHADOW),
        )
    }

    /// Add a block of buildings around grid origin `(ox, oz)`
    pub fn add_city_block(&mut self, graph: &mut SceneGraph, ox: f32, oz: f32) -> CityBlock {
        let node = graph.add_node(
            Node::group()
                .with_name(format!("block_{}_{}", ox, oz))
                .with_tag(TAG_CITY_BLOCK),
        );

        let probability = self.config.building_probability.clamp(0.0, 1.0);
        let lattice = self.lattice();
        let mut buildings = Vec::new();
        for &x in &lattice {
            for &z in &lattice {
                if self.rng.gen_bool(probability) {
                    let spec = self.building_spec(x, z, ox, oz);
                    self.add_building(graph, node, &spec);
                    buildings.push(spec);
                }
            }
        }

        CityBlock {
            node,
            origin: (ox, oz),
            buildings,
        }
    }

    /// Merged sphere cluster for one cloud
    pub fn cloud_mesh(&mut self) -> (MeshData, usize) {
        let count = 3 + (self.unit() * 4.0).floor() as usize;
        let spheres: Vec<MeshData> = (0..count)
            .map(|_| {
                let radius = self.unit() * 2.0 + 1.0;
                let offset = Vec3::new(self.centred(3.0), self.centred(1.5), self.centred(3.0));
                MeshData::sphere(radius, 16, 16).translated(offset)
            })
            .collect();
        (MeshData::merge(&spheres), count)
    }

    /// Add one cloud at a random position in the sky
    pub fn add_cloud(&mut self, graph: &mut SceneGraph) -> Cloud {
        let (mesh, sphere_count) = self.cloud_mesh();
        let geometry = graph.add_geometry(mesh);
        let material = graph.add_material(
            Material::phong(Color::WHITE)
                .with_opacity(0.8)
                .with_flat_shading(),
        );

        let position = Vec3::new(self.centred(100.0), 30.0 + self.unit() * 20.0, self.centred(100.0));
        let heading = self.unit() * TAU;

        let node = graph.add_node(
            Node::mesh(geometry, material)
                .with_tag(TAG_CLOUD)
                .with_transform(Transform::from_position(position).with_rotation(Vec3::new(0.0, heading, 0.0)))
                .with_flags(NodeFlags::CAST_SHADOW),
        );
        Cloud { node, sphere_count }
    }

    /// Add one airplane at a random position and heading
    pub fn add_airplane(&mut self, graph: &mut SceneGraph) -> Airplane {
        let node = graph.add_node(Node::group().with_tag(TAG_AIRPLANE));
        let parts = NodeFlags::CAST_SHADOW;

        let body_material = graph.add_material(Material::standard(Color::from_hex(0xc0c0c0), 0.8, 0.3));
        let wing_material = graph.add_material(Material::standard(Color::from_hex(0xd0d0d0), 0.6, 0.4));
        let tail_material = graph.add_material(Material::standard(Color::from_hex(0xd0d0d0), 0.6, 0.4));
        let cockpit_material = graph.add_material(
            Material::standard(Color::from_hex(0x2a2a2a), 0.9, 0.1).with_opacity(0.8),
        );

        let body_geometry = graph.add_geometry(MeshData::cylinder(0.4, 0.6, 5.0, 16));
        let body = graph.add_child(
            node,
            Node::mesh(body_geometry, body_material)
                .with_name("body")
                .with_transform(Transform::identity().with_rotation(Vec3::new(0.0, 0.0, PI / 2.0)))
                .with_flags(parts),
        );

        let wing_geometry = graph.add_geometry(MeshData::cuboid(4.0, 0.15, 1.5));
        graph.add_child(
            node,
            Node::mesh(wing_geometry, wing_material)
                .with_name("wing")
                .with_transform(Transform::from_position(Vec3::new(0.0, 0.2, 0.0)))
                .with_flags(parts),
        );

        let tail_geometry = graph.add_geometry(MeshData::cuboid(1.2, 0.15, 0.8));
        graph.add_child(
            node,
            Node::mesh(tail_geometry, tail_material)
                .with_name("tail")
                .with_transform(Transform::from_position(Vec3::new(-2.0, 0.6, 0.0)))
                .with_flags(parts),
        );

        // Shares the tail material
        let fin_geometry = graph.add_geometry(MeshData::cuboid(0.8, 1.0, 0.15));
        graph.add_child(
            node,
            Node::mesh(fin_geometry, tail_material)
                .with_name("vertical_tail")
                .with_transform(Transform::from_position(Vec3::new(-1.8, 0.8, 0.0)))
                .with_flags(parts),
        );

        let cockpit_geometry = graph.add_geometry(MeshData::sphere_section(0.4, 16, 12, 0.0, TAU, 0.0, PI / 2.0));
        let cockpit = graph.add_child(
            node,
            Node::mesh(cockpit_geometry, cockpit_material)
                .with_name("cockpit")
                .with_transform(
                    Transform::from_position(Vec3::new(1.0, 0.3, 0.0))
                        .with_rotation(Vec3::new(0.0, 0.0, -PI / 2.0)),
                )
                .with_flags(parts),
        );

        let position = Vec3::new(self.centred(100.0), 40.0 + self.unit() * 20.0, self.centred(100.0));
        let heading = self.unit() * TAU;
        if let Some(group) = graph.get_mut(node) {
            group.transform = Transform::from_position(position)
                .with_rotation(Vec3::new(0.0, heading, 0.0))
                .with_uniform_scale(2.0);
        }

        Airplane { node, body, cockpit }
    }

    /// Populate the whole scene
    pub fn populate(&mut self, graph: &mut SceneGraph) -> Population {
        let city_blocks: Vec<CityBlock> = BLOCK_OFFSETS
            .iter()
            .map(|&(ox, oz)| self.add_city_block(graph, ox, oz))
            .collect();

        let clouds: Vec<Cloud> = (0..self.config.cloud_count).map(|_| self.add_cloud(graph)).collect();
        let airplanes: Vec<Airplane> = (0..self.config.airplane_count).map(|_| self.add_airplane(graph)).collect();

        let population = Population {
            city_blocks,
            clouds,
            airplanes,
        };
        log::info!(
            "Populated {} city blocks ({} buildings), {} clouds, {} airplanes",
            population.city_blocks.len(),
            population.building_count(),
            population.clouds.len(),
            population.airplanes.len()
        );
        population
    }
}
