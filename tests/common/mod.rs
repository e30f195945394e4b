//! Shared helpers for integration tests

#![allow(dead_code)]

use skyline::config::AppConfig;
use skyline_core::{GeometryKey, SceneGraph};
use skyline_render::{Environment, FramePlan, PerspectiveCamera, RenderError, SceneRenderer};

/// Records every call instead of drawing
#[derive(Default)]
pub struct RecordingRenderer {
    pub frames: usize,
    pub drawn_meshes: usize,
    pub resizes: Vec<(u32, u32)>,
    pub released: Vec<GeometryKey>,
    pub detached: bool,
    /// Returned from every render call when set
    pub fail_with: Option<RenderError>,
    /// Renders attempted after detach
    pub renders_after_detach: usize,
}

impl SceneRenderer for RecordingRenderer {
    fn render(
        &mut self,
        graph: &SceneGraph,
        camera: &PerspectiveCamera,
        _environment: &Environment,
    ) -> Result<(), RenderError> {
        if self.detached {
            self.renders_after_detach += 1;
        }
        if let Some(e) = &self.fail_with {
            return Err(e.clone());
        }
        self.frames += 1;
        self.drawn_meshes = FramePlan::build(graph, camera.position).draw_count();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.resizes.push((width, height));
    }

    fn release(&mut self, geometries: &[GeometryKey]) -> usize {
        self.released.extend_from_slice(geometries);
        geometries.len()
    }

    fn detach(&mut self) {
        self.detached = true;
    }
}

/// Default configuration with a fixed seed
pub fn seeded_config(seed: u64) -> AppConfig {
    let mut config = AppConfig::default();
    config.scene.seed = Some(seed);
    config
}
