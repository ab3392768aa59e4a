//! End-to-end scene bootstrap and frame loop
//!
//! Builds each preset scene (shrunk where the full size only slows tests
//! down) and drives pointer ignition through `Scene::update`.

use ctor::ctor;
use fireplace_core::{CameraPreset, Scene, SceneConfig, TerrainMode, Vec2};
use tracing_subscriber::EnvFilter;

#[ctor]
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn small_sine() -> SceneConfig {
    SceneConfig {
        name: "small-sine".to_string(),
        width: 60,
        length: 60,
        camera_preset: CameraPreset::CloseUp,
        ..SceneConfig::sine_field()
    }
}

#[test]
fn test_sine_field_preset_bootstraps() {
    let scene = Scene::bootstrap(SceneConfig::sine_field()).unwrap();
    let mesh = scene.mesh();
    assert_eq!(mesh.vertex_count(), 400 * 400);
    assert_eq!(mesh.face_count(), 2 * 399 * 399);
    assert_eq!(scene.fires().capacity(), mesh.face_count());
    assert_eq!(scene.fires().total_fires(), 0);

    let colors = mesh.colors().unwrap();
    assert!(colors.iter().all(|&c| c == 0xff0000));

    let (low, high) = mesh.elevation_range();
    assert!(low >= -11.0 - 1e-4 && high <= -9.0 + 1e-4);
}

#[test]
fn test_held_pointer_lights_terrain_once() {
    let mut scene = Scene::bootstrap(small_sine()).unwrap();
    let ray = scene.pick_ray(Vec2::new(0.0, -0.5), 1.0).unwrap();
    assert!(scene.mesh().face_count() > 0);

    scene.pointer_down(ray);
    assert!(scene.pointer_held());
    let report = scene.update(0.05).unwrap();
    assert!(report.ignition_attempts >= 1);
    assert!(report.ignited >= 1, "pick ray should cross the terrain");
    let lit = report.lit;

    // Same ray again: every crossed face is already lit
    let report = scene.update(0.05).unwrap();
    assert!(report.ignition_attempts >= 1);
    assert_eq!(report.ignited, 0);
    assert_eq!(report.lit, lit);

    scene.pointer_up();
    let report = scene.update(0.05).unwrap();
    assert_eq!(report.ignition_attempts, 0);
    assert_eq!(report.lit, lit);
}

#[test]
fn test_pointer_move_changes_target() {
    let mut scene = Scene::bootstrap(small_sine()).unwrap();
    let first = scene.pick_ray(Vec2::new(0.0, -0.5), 1.0).unwrap();
    let second = scene.pick_ray(Vec2::new(0.4, -0.6), 1.0).unwrap();

    scene.pointer_down(first);
    let before = scene.update(0.05).unwrap().lit;
    scene.pointer_move(second);
    let after = scene.update(0.05).unwrap();
    assert!(after.ignited >= 1);
    assert_eq!(after.lit, before + after.ignited);
}

#[test]
fn test_fire_box_preset_has_volume() {
    let scene = Scene::bootstrap(SceneConfig::fire_box()).unwrap();
    assert_eq!(scene.mesh().face_count(), 2);
    let volume = scene.fire_volume().unwrap();
    assert_eq!(volume.face_count(), 8 * scene.mesh().face_count());
    assert!(!volume.is_empty());
}

#[test]
fn test_sloped_fire_box_presets_follow_corners() {
    for config in [SceneConfig::fire_box_rising(), SceneConfig::fire_box_falling()] {
        let heights = config.corner_heights.clone();
        let scene = Scene::bootstrap(config).unwrap();
        let mesh = scene.mesh();
        for (vertex, &height) in mesh.vertices().iter().zip(&heights) {
            assert_eq!(vertex.y, height);
        }
        assert_eq!(mesh.elevation_range(), (-5.0, 5.0));

        let volume = scene.fire_volume().unwrap();
        assert_eq!(volume.face_count(), 8 * mesh.face_count());
        let top = volume
            .vertices()
            .iter()
            .map(|v| v.y)
            .fold(f32::MIN, f32::max);
        assert_eq!(top, 5.0 + 10.0);
    }
}

#[test]
fn test_noise_preset_seeds_ambient_fires() {
    let config = SceneConfig {
        width: 80,
        length: 80,
        fire_density: 0.05,
        seed: 7,
        ..SceneConfig::noise_field()
    };
    assert_eq!(config.terrain_mode, TerrainMode::Noise);
    let mut scene = Scene::bootstrap(config.clone()).unwrap();
    let ambient = scene.fires().ambient().len();
    assert!(ambient > 0);
    assert!(scene.mesh().colors().is_none());

    let report = scene.update(0.5).unwrap();
    assert_eq!(report.ambient, ambient);
    assert_eq!(report.lit, 0);
    let elapsed = scene.elapsed();
    assert!(scene.fires().iter_all().all(|f| f.time() == elapsed));

    // Same seed, same fires
    let again = Scene::bootstrap(config).unwrap();
    let anchors = |s: &Scene| s.fires().ambient().iter().map(|f| f.anchor()).collect::<Vec<_>>();
    assert_eq!(anchors(&scene), anchors(&again));
}

#[test]
fn test_flat_plane_preset() {
    let scene = Scene::bootstrap(SceneConfig::flat_plane()).unwrap();
    assert_eq!(scene.mesh().vertex_count(), 4);
    assert_eq!(scene.mesh().face_count(), 2);
    assert_eq!(scene.camera().fov_degrees, 30.0);
    assert!(scene.fire_volume().is_none());
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = SceneConfig {
        cell_width: 0.0,
        ..small_sine()
    };
    assert!(Scene::bootstrap(config).is_err());
}
