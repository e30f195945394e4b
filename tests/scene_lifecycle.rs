//! Mount, frame and unmount scenarios against a recording renderer

mod common;

use common::{seeded_config, RecordingRenderer};
use skyline::config::AppConfig;
use skyline::scene::{TAG_AIRPLANE, TAG_CITY_BLOCK, TAG_CLOUD, TAG_GROUND};
use skyline::stage::{FrameStatus, Stage, StageError, Viewport};
use skyline_core::NodeKind;
use skyline_render::RenderError;

fn mount(config: &AppConfig) -> Stage<RecordingRenderer> {
    Stage::mount(Viewport::new(800, 600), config, RecordingRenderer::default()).unwrap()
}

#[test]
fn test_mount_builds_full_scene_before_first_frame() {
    let stage = mount(&AppConfig::default());
    let graph = stage.graph();

    assert_eq!(graph.count_tagged(TAG_GROUND), 1);
    assert_eq!(graph.count_kind(|k| matches!(k, NodeKind::AmbientLight { .. })), 1);
    assert_eq!(graph.count_kind(|k| matches!(k, NodeKind::DirectionalLight { .. })), 1);
    assert_eq!(graph.count_tagged(TAG_CITY_BLOCK), 9);
    assert_eq!(graph.count_tagged(TAG_CLOUD), 20);
    assert_eq!(graph.count_tagged(TAG_AIRPLANE), 3);

    assert_eq!(stage.renderer().frames, 0);
    assert_eq!(stage.renderer().resizes, vec![(800, 600)]);
    assert!((stage.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
}

#[test]
fn test_population_matches_graph() {
    let stage = mount(&seeded_config(5));
    let population = stage.population();
    assert_eq!(population.city_blocks.len(), 9);
    assert_eq!(
        stage.graph().count_tagged(skyline::scene::TAG_BUILDING),
        population.building_count()
    );
}

#[test]
fn test_seeded_mounts_are_identical() {
    let a = mount(&seeded_config(99));
    let b = mount(&seeded_config(99));
    let heights = |s: &Stage<RecordingRenderer>| -> Vec<f32> {
        s.population()
            .city_blocks
            .iter()
            .flat_map(|b| b.buildings.iter().map(|spec| spec.height))
            .collect()
    };
    assert_eq!(heights(&a), heights(&b));
}

#[test]
fn test_frames_draw_every_mesh() {
    let mut stage = mount(&seeded_config(1));
    for _ in 0..3 {
        assert_eq!(stage.frame(), FrameStatus::Continue);
    }
    let renderer = stage.renderer();
    assert_eq!(renderer.frames, 3);
    // Ground, buildings, clouds, five parts per airplane
    let expected = 1 + stage.population().building_count() + 20 + 3 * 5;
    assert_eq!(renderer.drawn_meshes, expected);
}

#[test]
fn test_resize_updates_camera_while_mounted() {
    let mut stage = mount(&seeded_config(2));
    assert!(stage.handle_resize(1200, 400));
    assert_eq!(stage.camera().aspect, 3.0);
    assert_eq!(stage.renderer().resizes.last(), Some(&(1200, 400)));
}

#[test]
fn test_unmount_detaches_resize_listener() {
    let mut stage = mount(&seeded_config(3));
    stage.unmount().unwrap();

    let aspect = stage.camera().aspect;
    let resizes = stage.renderer().resizes.len();
    assert!(!stage.handle_resize(1920, 1080));
    assert_eq!(stage.camera().aspect, aspect);
    assert_eq!(stage.renderer().resizes.len(), resizes);
}

#[test]
fn test_unmount_disposes_everything_once() {
    let mut stage = mount(&seeded_config(4));
    stage.frame();
    let report = stage.unmount().unwrap();

    let graph = stage.graph();
    assert!(graph.is_disposed());
    assert_eq!(report.geometries_disposed, graph.geometry_count());
    assert_eq!(report.materials_disposed, graph.material_count());
    for key in graph.geometry_keys() {
        assert_eq!(graph.geometry_disposals(key), Some(1));
    }
    // Includes the tail material shared by two airplane parts
    for key in graph.material_keys() {
        assert_eq!(graph.material_disposals(key), Some(1));
    }

    let renderer = stage.renderer();
    assert!(renderer.detached);
    assert_eq!(renderer.released.len(), graph.geometry_count());
    assert_eq!(report.gpu_meshes_released, graph.geometry_count());
    assert_eq!(report.frames_rendered, 1);
}

#[test]
fn test_no_frames_after_unmount() {
    let mut stage = mount(&seeded_config(6));
    stage.unmount().unwrap();
    assert_eq!(stage.frame(), FrameStatus::Stopped);
    assert_eq!(stage.renderer().renders_after_detach, 0);
    assert_eq!(stage.unmount(), Err(StageError::AlreadyUnmounted));
}

#[test]
fn test_out_of_memory_cancels_loop() {
    let mut stage = Stage::mount(
        Viewport::new(800, 600),
        &seeded_config(7),
        RecordingRenderer {
            fail_with: Some(RenderError::OutOfMemory),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(stage.frame(), FrameStatus::Stopped);
    assert!(stage.cancellation_token().is_cancelled());

    // Teardown still works after a fatal frame
    assert!(stage.unmount().is_ok());
}

#[test]
fn test_zero_surface_rejected() {
    let result = Stage::mount(Viewport::new(800, 0), &AppConfig::default(), RecordingRenderer::default());
    assert!(matches!(
        result,
        Err(StageError::SurfaceUnavailable { width: 800, height: 0 })
    ));
}
