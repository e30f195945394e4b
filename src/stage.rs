//! Stage - the mounted city scene
//!
//! A [`Stage`] owns everything that lives between mount and unmount: the
//! scene graph, camera, orbit controls, animation driver and renderer. The
//! embedding application forwards window events to it and calls
//! [`Stage::frame`] once per redraw.
//!
//! ## Lifecycle
//!
//! 1. [`Stage::mount`] builds and populates the scene and attaches the resize
//!    listener
//! 2. [`Stage::frame`] runs controls, animation and rendering until the
//!    cancellation token is set
//! 3. [`Stage::unmount`] stops the loop, detaches the surface and disposes
//!    every geometry and material exactly once

use skyline_core::SceneGraph;
use skyline_input::OrbitController;
use skyline_render::{ContextError, Environment, PerspectiveCamera, SceneRenderer};

use crate::config::AppConfig;
use crate::scene::{build_base_scene, Population, Populator};
use crate::systems::{AnimationDriver, CancellationToken};

/// Size of the drawing surface in physical pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True if either side is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Whether the frame loop should keep going
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Stopped,
}

/// What unmount released
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TeardownReport {
    pub geometries_disposed: usize,
    pub materials_disposed: usize,
    /// Geometries that had GPU buffers
    pub gpu_meshes_released: usize,
    pub frames_rendered: u64,
}

/// Errors mounting or unmounting a stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    /// The drawing surface has no area or could not be created
    SurfaceUnavailable { width: u32, height: u32 },
    /// GPU adapter or device could not be acquired
    ResourceExhausted(String),
    /// `unmount` was already called
    AlreadyUnmounted,
}

impl StageError {
    /// Classify a render context failure for a surface of the given size
    pub fn from_context(err: ContextError, viewport: Viewport) -> Self {
        match err {
            ContextError::SurfaceUnavailable(msg) => {
                log::error!("Surface unavailable: {}", msg);
                StageError::SurfaceUnavailable {
                    width: viewport.width,
                    height: viewport.height,
                }
            }
            ContextError::ResourceExhausted(msg) => StageError::ResourceExhausted(msg),
        }
    }
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageError::SurfaceUnavailable { width, height } => {
                write!(f, "Drawing surface unavailable ({}x{})", width, height)
            }
            StageError::ResourceExhausted(msg) => write!(f, "GPU resources exhausted: {}", msg),
            StageError::AlreadyUnmounted => write!(f, "Stage already unmounted"),
        }
    }
}

impl std::error::Error for StageError {}

/// The mounted scene and its frame loop
pub struct Stage<R: SceneRenderer> {
    graph: SceneGraph,
    population: Population,
    camera: PerspectiveCamera,
    controls: OrbitController,
    environment: Environment,
    animation: AnimationDriver,
    renderer: R,
    token: CancellationToken,
    resize_attached: bool,
    mounted: bool,
    frames: u64,
}

impl<R: SceneRenderer> Stage<R> {
    /// Build and populate the scene, seeding from configuration or entropy
    pub fn mount(viewport: Viewport, config: &AppConfig, renderer: R) -> Result<Self, StageError> {
        Self::mount_with(viewport, config, renderer, Populator::from_config(&config.scene))
    }

    /// Build the scene and populate it with a given populator
    pub fn mount_with<G: rand::Rng>(
        viewport: Viewport,
        config: &AppConfig,
        mut renderer: R,
        mut populator: Populator<G>,
    ) -> Result<Self, StageError> {
        let base = build_base_scene(viewport, config)?;
        let mut graph = base.graph;
        let population = populator.populate(&mut graph);

        let camera = base.camera;
        let c = &config.controls;
        let mut controls = OrbitController::new()
            .with_target(camera.target)
            .with_damping(c.damping_factor)
            .with_distance_range(c.min_distance, c.max_distance)
            .with_max_polar_angle(c.max_polar_angle.to_radians())
            .with_rotate_speed(c.rotate_speed)
            .with_zoom_speed(c.zoom_speed)
            .with_pan_speed(c.pan_speed);
        controls.viewport_height = viewport.height as f32;
        controls.save_state(&camera);

        renderer.resize(viewport.width, viewport.height);

        log::info!(
            "Stage mounted at {}x{}: {} nodes, {} geometries, {} materials",
            viewport.width,
            viewport.height,
            graph.node_count(),
            graph.geometry_count(),
            graph.material_count()
        );

        Ok(Self {
            graph,
            population,
            camera,
            controls,
            environment: base.environment,
            animation: AnimationDriver::new(config.animation.clone()),
            renderer,
            token: CancellationToken::new(),
            resize_attached: true,
            mounted: true,
            frames: 0,
        })
    }

    /// Run one frame: controls, animation, render
    pub fn frame(&mut self) -> FrameStatus {
        if self.token.is_cancelled() {
            return FrameStatus::Stopped;
        }

        self.controls.update(&mut self.camera);
        self.animation
            .step(&mut self.graph, &self.population, self.camera.position);

        match self
            .renderer
            .render(&self.graph, &self.camera, &self.environment)
        {
            Ok(()) => self.frames += 1,
            Err(e) if e.is_fatal() => {
                log::error!("Render failed, stopping frame loop: {}", e);
                self.token.cancel();
                return FrameStatus::Stopped;
            }
            Err(e) => log::warn!("Frame skipped: {}", e),
        }

        FrameStatus::Continue
    }

    /// Match camera and renderer to a new surface size
    ///
    /// Returns false if the resize was ignored: zero sized, or the stage is
    /// no longer listening.
    pub fn handle_resize(&mut self, width: u32, height: u32) -> bool {
        if !self.resize_attached {
            return false;
        }
        let viewport = Viewport::new(width, height);
        if viewport.is_empty() {
            log::debug!("Ignoring zero-sized resize {}x{}", width, height);
            return false;
        }
        self.camera.set_aspect(viewport.aspect());
        self.controls.viewport_height = height as f32;
        self.renderer.resize(width, height);
        log::debug!("Resized to {}x{}", width, height);
        true
    }

    /// Stop the loop and release everything the stage created
    pub fn unmount(&mut self) -> Result<TeardownReport, StageError> {
        if !self.mounted {
            return Err(StageError::AlreadyUnmounted);
        }
        self.mounted = false;
        self.token.cancel();
        self.resize_attached = false;

        let disposed = self.graph.dispose_all();
        let gpu_meshes_released = self.renderer.release(&disposed.geometries);
        self.renderer.detach();

        let report = TeardownReport {
            geometries_disposed: disposed.geometries.len(),
            materials_disposed: disposed.materials.len(),
            gpu_meshes_released,
            frames_rendered: self.frames,
        };
        log::info!(
            "Stage unmounted after {} frames: {} geometries, {} materials disposed",
            report.frames_rendered,
            report.geometries_disposed,
            report.materials_disposed
        );
        Ok(report)
    }

    /// Restore the camera to where it was at mount
    pub fn reset_view(&mut self) {
        self.controls.reset(&mut self.camera);
    }

    /// A handle that stops the frame loop when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn controls_mut(&mut self) -> &mut OrbitController {
        &mut self.controls
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyline_core::GeometryKey;
    use skyline_render::RenderError;

    /// Renders nothing; fails with `fail_with` when set
    #[derive(Default)]
    struct NullRenderer {
        fail_with: Option<RenderError>,
        detached: bool,
    }

    impl SceneRenderer for NullRenderer {
        fn render(&mut self, _: &SceneGraph, _: &PerspectiveCamera, _: &Environment) -> Result<(), RenderError> {
            match &self.fail_with {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
        fn resize(&mut self, _: u32, _: u32) {}
        fn release(&mut self, _: &[GeometryKey]) -> usize {
            0
        }
        fn detach(&mut self) {
            self.detached = true;
        }
    }

    fn small_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.scene.seed = Some(11);
        config.scene.cloud_count = 2;
        config.scene.airplane_count = 1;
        config
    }

    fn mount(renderer: NullRenderer) -> Stage<NullRenderer> {
        Stage::mount(Viewport::new(800, 600), &small_config(), renderer).unwrap()
    }

    #[test]
    fn test_viewport_aspect() {
        assert!((Viewport::new(800, 600).aspect() - 4.0 / 3.0).abs() < 1e-6);
        assert!(Viewport::new(0, 600).is_empty());
        assert!(Viewport::new(800, 0).is_empty());
    }

    #[test]
    fn test_mount_rejects_zero_viewport() {
        let result = Stage::mount(Viewport::new(0, 0), &small_config(), NullRenderer::default());
        assert!(matches!(result, Err(StageError::SurfaceUnavailable { width: 0, height: 0 })));
    }

    #[test]
    fn test_frames_counted() {
        let mut stage = mount(NullRenderer::default());
        for _ in 0..5 {
            assert_eq!(stage.frame(), FrameStatus::Continue);
        }
        assert_eq!(stage.frames_rendered(), 5);
    }

    #[test]
    fn test_recoverable_error_keeps_looping() {
        let mut stage = mount(NullRenderer {
            fail_with: Some(RenderError::SurfaceLost),
            ..Default::default()
        });
        assert_eq!(stage.frame(), FrameStatus::Continue);
        assert_eq!(stage.frames_rendered(), 0);
        assert!(!stage.cancellation_token().is_cancelled());
    }

    #[test]
    fn test_fatal_error_stops_loop() {
        let mut stage = mount(NullRenderer {
            fail_with: Some(RenderError::OutOfMemory),
            ..Default::default()
        });
        assert_eq!(stage.frame(), FrameStatus::Stopped);
        assert_eq!(stage.frame(), FrameStatus::Stopped);
        assert!(stage.cancellation_token().is_cancelled());
    }

    #[test]
    fn test_external_cancel_stops_loop() {
        let mut stage = mount(NullRenderer::default());
        stage.cancellation_token().cancel();
        assert_eq!(stage.frame(), FrameStatus::Stopped);
        assert_eq!(stage.frames_rendered(), 0);
    }

    #[test]
    fn test_zero_resize_ignored() {
        let mut stage = mount(NullRenderer::default());
        let aspect = stage.camera().aspect;
        assert!(!stage.handle_resize(0, 600));
        assert_eq!(stage.camera().aspect, aspect);
        assert!(stage.handle_resize(1000, 500));
        assert_eq!(stage.camera().aspect, 2.0);
    }

    #[test]
    fn test_second_unmount_fails() {
        let mut stage = mount(NullRenderer::default());
        assert!(stage.unmount().is_ok());
        assert!(stage.renderer().detached);
        assert_eq!(stage.unmount(), Err(StageError::AlreadyUnmounted));
    }

    #[test]
    fn test_stage_error_from_context() {
        let vp = Viewport::new(640, 0);
        assert_eq!(
            StageError::from_context(ContextError::SurfaceUnavailable("zero".into()), vp),
            StageError::SurfaceUnavailable { width: 640, height: 0 }
        );
        assert_eq!(
            StageError::from_context(ContextError::ResourceExhausted("no adapter".into()), vp),
            StageError::ResourceExhausted("no adapter".into())
        );
    }
}
