//! Scene bootstrap and frame loop
//!
//! A [`Scene`] owns the terrain mesh, the fire placement table and the
//! pointer state built from one [`SceneConfig`]. The host calls
//! [`Scene::update`] once per frame with the frame time. When at least one
//! ignition attempt falls due on the igniter's cadence, the pointer ray is
//! cast once, and every fire is then advanced to the new elapsed time.

use crate::config::{Camera, SceneConfig, TerrainMode};
use crate::core_types::vec3::Vec2;
use crate::error::{FirePlaceError, Result};
use crate::fire::{FirePlacementTable, IgnitionTimer};
use crate::picking::{raycast_all, Ray};
use crate::terrain::{fire_volume, HeightProfile, HeightfieldMesh, VolumeMesh};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

/// What happened during one [`Scene::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Ignition attempts that fell due on the igniter's cadence
    pub ignition_attempts: u32,
    /// Faces newly set alight this frame
    pub ignited: usize,
    /// Faces alight after the frame
    pub lit: usize,
    /// Ambient fires in the scene
    pub ambient: usize,
}

/// Terrain, fires and pointer state for one configured scene
#[derive(Debug, Clone)]
pub struct Scene {
    config: SceneConfig,
    mesh: HeightfieldMesh,
    fires: FirePlacementTable,
    fire_volume: Option<VolumeMesh>,
    timer: IgnitionTimer,
    pointer: Option<Ray>,
    elapsed: f32,
}

impl Scene {
    /// Build the terrain, seed ambient fires and prepare the igniter.
    ///
    /// # Errors
    /// Returns [`FirePlaceError::InvalidArgument`] if the config fails
    /// validation or any terrain parameter is rejected during construction.
    pub fn bootstrap(config: SceneConfig) -> Result<Self> {
        config.validate()?;

        let (width, length) = (config.width, config.length);
        let (cw, cl) = (config.cell_width, config.cell_length);
        let mut mesh = match config.terrain_mode {
            TerrainMode::Sine => HeightProfile::Sine(config.sine).build(width, length, cw, cl)?,
            TerrainMode::Flat => HeightProfile::Flat {
                elevation: config.flat_elevation,
            }
            .build(width, length, cw, cl)?,
            TerrainMode::Corners => HeightProfile::Corners(config.corner_heights.clone())
                .build(width, length, cw, cl)?,
            TerrainMode::Noise => {
                let mut mesh = HeightProfile::default().build(width, length, cw, cl)?;
                mesh.displace(&config.noise)?;
                mesh
            }
        };
        if let Some(color) = config.vertex_color {
            mesh.paint(color);
        }

        let mut fires = FirePlacementTable::for_mesh(&mesh).with_fire_scale(config.fire_scale);
        fires.ensure_capacity_matches(&mesh)?;
        if config.fire_density > 0.0 {
            let mut rng = StdRng::seed_from_u64(config.seed);
            fires.random_seed(
                config.fire_density,
                mesh.vertices().iter().copied(),
                &mut rng,
            )?;
        }

        let volume = config
            .fire_box_height
            .map(|height| fire_volume(&mesh, height))
            .transpose()?;

        let timer = IgnitionTimer::new(config.ignite_interval)?;

        info!(
            "Scene '{}' ready: {}x{} {:?} terrain, {} faces, {} ambient fires",
            config.name,
            width,
            length,
            config.terrain_mode,
            mesh.face_count(),
            fires.ambient().len()
        );

        Ok(Self {
            config,
            mesh,
            fires,
            fire_volume: volume,
            timer,
            pointer: None,
            elapsed: 0.0,
        })
    }

    /// Configuration the scene was built from
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Terrain mesh
    pub fn mesh(&self) -> &HeightfieldMesh {
        &self.mesh
    }

    /// Fire placement table
    pub fn fires(&self) -> &FirePlacementTable {
        &self.fires
    }

    /// Mutable fire placement table, for hosts that place fires directly
    pub fn fires_mut(&mut self) -> &mut FirePlacementTable {
        &mut self.fires
    }

    /// Fire box volume, when the config asks for one
    pub fn fire_volume(&self) -> Option<&VolumeMesh> {
        self.fire_volume.as_ref()
    }

    /// Camera for the configured preset
    pub fn camera(&self) -> Camera {
        self.config.camera_preset.camera()
    }

    /// Seconds since the scene started
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Whether the pointer is currently held down
    pub fn pointer_held(&self) -> bool {
        self.timer.is_held()
    }

    /// Pick ray through a screen point given in normalized device coordinates.
    ///
    /// # Errors
    /// Returns [`FirePlaceError::InvalidArgument`] for a degenerate camera or
    /// a non-positive `aspect`.
    pub fn pick_ray(&self, ndc: Vec2, aspect: f32) -> Result<Ray> {
        Ray::from_camera(&self.camera(), ndc, aspect)
    }

    /// Press the pointer along `ray` and start repeated ignition.
    pub fn pointer_down(&mut self, ray: Ray) {
        self.pointer = Some(ray);
        self.timer.press();
        debug!("Pointer down");
    }

    /// Move the pointer; later ignition attempts use the new ray.
    pub fn pointer_move(&mut self, ray: Ray) {
        self.pointer = Some(ray);
    }

    /// Release the pointer and stop repeated ignition.
    pub fn pointer_up(&mut self) {
        self.timer.release();
        debug!("Pointer up");
    }

    /// Try to light every face crossed by `ray`. Returns how many were newly lit.
    ///
    /// A ray that misses the terrain lights nothing.
    ///
    /// # Errors
    /// Propagates [`FirePlacementTable::try_ignite`] errors, which only occur
    /// if the table and mesh disagree on face count.
    pub fn ignite_along(&mut self, ray: &Ray) -> Result<usize> {
        let mut ignited = 0;
        for hit in raycast_all(&self.mesh, ray) {
            if self.fires.try_ignite(hit.face_index, hit.point)? {
                ignited += 1;
            }
        }
        Ok(ignited)
    }

    /// Run one frame of `dt` seconds.
    ///
    /// # Errors
    /// Returns [`FirePlaceError::InvalidArgument`] if `dt` is negative or not
    /// finite.
    pub fn update(&mut self, dt: f32) -> Result<FrameReport> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(FirePlaceError::invalid(
                "dt",
                format!("must be finite and non-negative, got {dt}"),
            ));
        }

        let attempts = self.timer.tick(dt);
        // Ray and mesh are fixed within a frame, so one cast covers every due attempt
        let ignited = match self.pointer.filter(|_| attempts > 0) {
            Some(ray) => self.ignite_along(&ray)?,
            None => 0,
        };

        self.elapsed += dt;
        self.fires.advance(self.elapsed);

        Ok(FrameReport {
            ignition_attempts: attempts,
            ignited,
            lit: self.fires.lit_count(),
            ambient: self.fires.ambient().len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::vec3::Vec3;

    fn small_flat() -> SceneConfig {
        SceneConfig {
            name: "test".to_string(),
            width: 4,
            length: 4,
            terrain_mode: TerrainMode::Flat,
            ..SceneConfig::flat_plane()
        }
    }

    #[test]
    fn test_bootstrap_flat() {
        let scene = Scene::bootstrap(small_flat()).unwrap();
        assert_eq!(scene.mesh().face_count(), 18);
        assert_eq!(scene.fires().capacity(), 18);
        assert!(scene.fire_volume().is_none());
        assert_eq!(scene.fires().total_fires(), 0);
    }

    #[test]
    fn test_held_pointer_ignites_once_per_face() {
        let mut config = small_flat();
        config.cell_width = 1.0;
        config.cell_length = 1.0;
        config.ignite_interval = 0.25;
        let mut scene = Scene::bootstrap(config).unwrap();

        let ray = Ray::new(Vec3::new(-0.75, 10.0, 0.25), Vec3::new(0.0, -1.0, 0.0)).unwrap();
        scene.pointer_down(ray);
        let report = scene.update(1.0).unwrap();
        assert_eq!(report.ignition_attempts, 4);
        assert_eq!(report.ignited, 1);
        assert_eq!(report.lit, 1);

        scene.pointer_up();
        let report = scene.update(1.0).unwrap();
        assert_eq!(report.ignition_attempts, 0);
        assert_eq!(scene.elapsed(), 2.0);
        assert!(scene.fires().iter_all().all(|f| f.time() == 2.0));
    }

    #[test]
    fn test_long_frame_casts_once() {
        let mut config = small_flat();
        config.cell_width = 1.0;
        config.cell_length = 1.0;
        let mut scene = Scene::bootstrap(config).unwrap();

        let ray = Ray::new(Vec3::new(-0.75, 10.0, 0.25), Vec3::new(0.0, -1.0, 0.0)).unwrap();
        let mut single = scene.clone();
        let expected = single.ignite_along(&ray).unwrap();

        scene.pointer_down(ray);
        let report = scene.update(f32::MAX).unwrap();
        assert_eq!(report.ignition_attempts, u32::MAX);
        assert_eq!(report.ignited, expected);
        assert_eq!(report.lit, single.fires().lit_count());
    }

    #[test]
    fn test_negative_dt_rejected() {
        let mut scene = Scene::bootstrap(small_flat()).unwrap();
        assert!(scene.update(-0.1).is_err());
        assert!(scene.update(f32::NAN).is_err());
    }
}
