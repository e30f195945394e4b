//! Randomised property checks for generation and per-frame motion

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skyline::config::SceneConfig;
use skyline::scene::{Populator, BLOCK_OFFSETS};
use skyline::systems::AnimationDriver;
use skyline_core::{Color, Hsl, NodeKind, SceneGraph, Transform, Vec3};

const TRIALS: usize = 200;

#[test]
fn test_cloud_drift_is_linear_until_wrap() {
    let driver = AnimationDriver::default();
    let mut rng = StdRng::seed_from_u64(1);

    for _ in 0..TRIALS {
        let x0: f32 = rng.gen_range(-50.0..50.0);
        let frames = rng.gen_range(1..3000);
        let mut t = Transform::from_position(Vec3::new(x0, 40.0, 0.0));
        let mut wrapped = false;

        for _ in 0..frames {
            let before = t.position.x;
            driver.step_cloud(&mut t);
            assert!(t.position.x <= 50.0, "cloud left at x = {}", t.position.x);
            if t.position.x < before {
                assert_eq!(t.position.x, -50.0);
                wrapped = true;
            }
        }

        if !wrapped {
            let expected = x0 + 0.05 * frames as f32;
            assert!((t.position.x - expected).abs() < 1e-2, "{} vs {}", t.position.x, expected);
        }
    }
}

#[test]
fn test_airplane_z_is_function_of_x() {
    let driver = AnimationDriver::default();
    let mut rng = StdRng::seed_from_u64(2);

    for _ in 0..TRIALS {
        let start = Vec3::new(rng.gen_range(-50.0..50.0), 45.0, rng.gen_range(-50.0..50.0));
        let mut t = Transform::from_position(start);
        for _ in 0..rng.gen_range(1..2000) {
            driver.step_airplane(&mut t);
        }
        let x = t.position.x;
        assert!(x <= 50.0);
        assert!((t.position.z - 20.0 * (0.02 * x).sin()).abs() < 1e-4);
        assert_eq!(t.position.y, 45.0);
    }
}

#[test]
fn test_recycled_blocks_land_in_range() {
    let driver = AnimationDriver::default();
    let mut rng = StdRng::seed_from_u64(3);
    let half_diagonal = 20.0 * std::f32::consts::SQRT_2;

    for _ in 0..TRIALS * 10 {
        let camera = Vec3::new(rng.gen_range(-2000.0..2000.0), 30.0, rng.gen_range(-2000.0..2000.0));
        let block = Vec3::new(rng.gen_range(-100.0..100.0), 0.0, rng.gen_range(-100.0..100.0));
        let origin = BLOCK_OFFSETS[rng.gen_range(0..BLOCK_OFFSETS.len())];

        match driver.recycle_target(block, origin, camera) {
            Some(target) => {
                assert!(block.planar_distance(camera) > 80.0);
                assert!((-20.0..20.0).contains(&target.x), "x = {}", target.x);
                assert!((-20.0..20.0).contains(&target.z), "z = {}", target.z);
                assert_eq!(target.y, 0.0);
                assert!(target.planar_distance(Vec3::ZERO) <= half_diagonal);
            }
            None => assert!(block.planar_distance(camera) <= 80.0),
        }
    }
}

#[test]
fn test_building_specs_in_range() {
    let mut graph = SceneGraph::new();
    let population = Populator::from_seed(4, SceneConfig::default()).populate(&mut graph);
    assert!(population.building_count() > 0);

    for block in &population.city_blocks {
        let children = graph.get(block.node).unwrap().children();
        assert_eq!(children.len(), block.buildings.len());

        for (spec, &child) in block.buildings.iter().zip(children) {
            assert!((5.0..20.0).contains(&spec.height));
            assert!((0.0..1.0).contains(&spec.hue));
            assert_eq!(spec.saturation, 0.7);
            assert_eq!(spec.lightness, 0.6);

            let node = graph.get(child).unwrap();
            assert_eq!(node.transform.position, spec.position);
            let NodeKind::Mesh { material, .. } = node.kind else {
                panic!("building is not a mesh");
            };
            let expected = Color::from_hsl(Hsl::new(spec.hue, 0.7, 0.6));
            assert_eq!(graph.material(material).unwrap().color, expected);
        }
    }
}

#[test]
fn test_lattice_occupancy_converges() {
    let mut graph = SceneGraph::new();
    let mut populator = Populator::from_seed(5, SceneConfig::default());
    let sites = populator.lattice().len().pow(2);
    assert_eq!(sites, 36);

    let blocks = 300;
    let occupied: usize = (0..blocks)
        .map(|_| populator.add_city_block(&mut graph, 0.0, 0.0).buildings.len())
        .sum();
    let fraction = occupied as f64 / (blocks * sites) as f64;
    // ~10k Bernoulli(0.7) trials; standard error is about 0.0044
    assert!((fraction - 0.7).abs() < 0.02, "occupancy {}", fraction);
}
