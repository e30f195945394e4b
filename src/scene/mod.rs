//! Scene construction utilities
//!
//! The builder creates the static scene (camera, lights, ground); the
//! populator fills it with buildings, clouds and airplanes.

mod scene_builder;
mod populator;

pub use scene_builder::{build_base_scene, BaseScene, SceneBuilder, TAG_GROUND, TAG_LIGHT};
pub use populator::{
    Airplane, BuildingSpec, CityBlock, Cloud, Population, Populator, BLOCK_OFFSETS, TAG_AIRPLANE,
    TAG_BUILDING, TAG_CITY_BLOCK, TAG_CLOUD,
};
