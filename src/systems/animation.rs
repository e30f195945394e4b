//! Per-frame animation of clouds, airplanes and city blocks
//!
//! Each step is a pure function of a [`Transform`] (plus the camera position
//! for recycling) so the motion rules can be tested without a scene.

use skyline_core::{SceneGraph, Transform, Vec3};

use crate::config::AnimationConfig;
use crate::scene::Population;

/// What one animation step changed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnimationReport {
    pub clouds: usize,
    pub airplanes: usize,
    /// Blocks moved back near the camera this frame
    pub recycled_blocks: usize,
}

/// Drives the motion of dynamic objects
#[derive(Clone, Debug)]
pub struct AnimationDriver {
    config: AnimationConfig,
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}

impl AnimationDriver {
    pub fn new(config: AnimationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Wrap `x` back to the left edge once it passes the right one
    #[inline]
    fn wrap(&self, x: f32) -> f32 {
        if x > self.config.wrap_limit {
            -self.config.wrap_limit
        } else {
            x
        }
    }

    /// Drift a cloud along +X and spin it slowly
    pub fn step_cloud(&self, transform: &mut Transform) {
        transform.position.x = self.wrap(transform.position.x + self.config.cloud_speed);
        transform.rotation.y += self.config.cloud_spin;
    }

    /// Advance an airplane along +X, weaving in Z and rolling about Z
    ///
    /// Z and roll are derived from the wrapped X, so after any number of
    /// steps `z == amplitude * sin(frequency * x)`.
    pub fn step_airplane(&self, transform: &mut Transform) {
        let c = &self.config;
        let x = self.wrap(transform.position.x + c.airplane_speed);
        transform.position.x = x;
        transform.position.z = c.weave_amplitude * (x * c.weave_frequency).sin();
        transform.rotation.z = (x * c.roll_frequency).sin() * c.roll_amplitude;
    }

    /// New position for a block too far from the camera, if any
    ///
    /// The target is `((cam + origin + 200) mod 40) - 20` per axis with a
    /// Euclidean modulo, so it always lies in `[-20, 20)`.
    ///
    /// Every block origin is a multiple of 40, so the origin drops out of the
    /// fold and all recycled blocks share one target for a given camera. Only
    /// the group moves; building positions already carry the origin offset.
    pub fn recycle_target(&self, block: Vec3, origin: (f32, f32), camera: Vec3) -> Option<Vec3> {
        if block.planar_distance(camera) <= self.config.recycle_distance {
            return None;
        }
        let wrap = |c: f32, o: f32| {
            let r = (c + o + 200.0).rem_euclid(40.0);
            // rem_euclid can round up to the modulus for tiny negative inputs
            if r >= 40.0 { -20.0 } else { r - 20.0 }
        };
        Some(Vec3::new(wrap(camera.x, origin.0), 0.0, wrap(camera.z, origin.1)))
    }

    /// Advance every dynamic object by one frame
    pub fn step(&self, graph: &mut SceneGraph, population: &Population, camera: Vec3) -> AnimationReport {
        let mut report = AnimationReport::default();

        for cloud in &population.clouds {
            if let Some(node) = graph.get_mut(cloud.node) {
                self.step_cloud(&mut node.transform);
                report.clouds += 1;
            }
        }

        for airplane in &population.airplanes {
            if let Some(node) = graph.get_mut(airplane.node) {
                self.step_airplane(&mut node.transform);
                report.airplanes += 1;
            }
        }

        for block in &population.city_blocks {
            let Some(node) = graph.get_mut(block.node) else { continue };
            if let Some(target) = self.recycle_target(node.transform.position, block.origin, camera) {
                log::debug!(
                    "Recycling block {:?} from ({:.1}, {:.1}) to ({:.1}, {:.1})",
                    block.origin,
                    node.transform.position.x,
                    node.transform.position.z,
                    target.x,
                    target.z
                );
                node.transform.position = target;
                report.recycled_blocks += 1;
            }
        }

        report
    }
}
