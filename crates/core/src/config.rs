//! Scene configuration
//!
//! One `SceneConfig` describes a whole scene. Each scene layout is available
//! as a named preset, and configs can be loaded from JSON with every field
//! optional (missing fields fall back to the sine-field preset).

use crate::core_types::vec3::Vec3;
use crate::error::{FirePlaceError, Result};
use crate::fire::{DEFAULT_FIRE_SCALE, DEFAULT_IGNITE_INTERVAL};
use crate::terrain::{NoiseDisplacement, SineWave, DEFAULT_FIRE_BOX_HEIGHT};
use serde::{Deserialize, Serialize};

/// How the terrain surface is shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainMode {
    /// Sine ridges from [`SceneConfig::sine`]
    #[default]
    Sine,
    /// Flat grid displaced by [`SceneConfig::noise`]
    Noise,
    /// Plane at [`SceneConfig::flat_elevation`]
    Flat,
    /// Explicit per-vertex elevations from [`SceneConfig::corner_heights`]
    Corners,
}

/// Perspective camera placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Eye position
    pub position: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
    /// World up hint
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
}

/// Named camera placements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraPreset {
    /// Straight on from +Z at eye level
    #[default]
    CloseUp,
    /// Raised and pulled back, looking slightly down at the terrain
    Elevated,
    /// Narrow field of view from a diagonal vantage point
    Overview,
}

impl CameraPreset {
    /// Camera for this preset
    pub fn camera(self) -> Camera {
        match self {
            Self::CloseUp => Camera {
                position: Vec3::new(0.0, 0.0, 20.0),
                target: Vec3::zeros(),
                up: Vec3::y(),
                fov_degrees: 75.0,
            },
            Self::Elevated => Camera {
                position: Vec3::new(0.0, 15.0, 50.0),
                target: Vec3::new(0.0, 10.0, 0.0),
                up: Vec3::y(),
                fov_degrees: 75.0,
            },
            Self::Overview => Camera {
                position: Vec3::new(45.0, 20.0, 40.0),
                target: Vec3::zeros(),
                up: Vec3::y(),
                fov_degrees: 30.0,
            },
        }
    }
}

/// Everything needed to bootstrap a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Label used in logs
    pub name: String,
    /// Vertices along X
    pub width: usize,
    /// Vertices along Z
    pub length: usize,
    /// Vertex spacing along X
    pub cell_width: f32,
    /// Vertex spacing along Z
    pub cell_length: f32,
    /// Surface shape
    pub terrain_mode: TerrainMode,
    /// Ridge parameters for [`TerrainMode::Sine`]
    pub sine: SineWave,
    /// Displacement parameters for [`TerrainMode::Noise`]
    pub noise: NoiseDisplacement,
    /// Plane elevation for [`TerrainMode::Flat`]
    pub flat_elevation: f32,
    /// Per-vertex elevations for [`TerrainMode::Corners`], in `i * length + j` order
    pub corner_heights: Vec<f32>,
    /// Probability that each vertex gets an ambient fire
    pub fire_density: f32,
    /// Billboard scale of every fire
    pub fire_scale: f32,
    /// Extrude a fire box volume of this height over the terrain
    pub fire_box_height: Option<f32>,
    /// Per-vertex color, 0xRRGGBB
    pub vertex_color: Option<u32>,
    /// Camera placement
    pub camera_preset: CameraPreset,
    /// Seconds between ignition attempts while the pointer is held
    pub ignite_interval: f32,
    /// Seed for ambient fire placement
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::sine_field()
    }
}

impl SceneConfig {
    /// Preset names accepted by [`SceneConfig::preset`]
    pub const PRESETS: [&'static str; 6] = [
        "sine-field",
        "noise-field",
        "fire-box",
        "fire-box-rising",
        "fire-box-falling",
        "flat-plane",
    ];

    /// Large rippled field where fires are lit by holding the pointer.
    pub fn sine_field() -> Self {
        Self {
            name: "sine-field".to_string(),
            width: 400,
            length: 400,
            cell_width: 1.0,
            cell_length: 1.0,
            terrain_mode: TerrainMode::Sine,
            sine: SineWave::default(),
            noise: NoiseDisplacement::default(),
            flat_elevation: 0.0,
            corner_heights: Vec::new(),
            fire_density: 0.0,
            fire_scale: DEFAULT_FIRE_SCALE,
            fire_box_height: None,
            vertex_color: Some(crate::terrain::DEFAULT_VERTEX_COLOR),
            camera_preset: CameraPreset::CloseUp,
            ignite_interval: DEFAULT_IGNITE_INTERVAL,
            seed: 0,
        }
    }

    /// Rolling noise terrain with a sprinkle of ambient fires.
    pub fn noise_field() -> Self {
        Self {
            name: "noise-field".to_string(),
            width: 200,
            length: 200,
            cell_width: 4.0,
            cell_length: 4.0,
            terrain_mode: TerrainMode::Noise,
            fire_density: 0.01,
            vertex_color: None,
            camera_preset: CameraPreset::Elevated,
            ..Self::sine_field()
        }
    }

    /// Single tile with a fire box volume standing on it.
    pub fn fire_box() -> Self {
        Self {
            name: "fire-box".to_string(),
            width: 2,
            length: 2,
            cell_width: 5.0,
            cell_length: 5.0,
            terrain_mode: TerrainMode::Flat,
            fire_box_height: Some(DEFAULT_FIRE_BOX_HEIGHT),
            ..Self::sine_field()
        }
    }

    /// Fire box over a tile tilted up along +X.
    pub fn fire_box_rising() -> Self {
        Self {
            name: "fire-box-rising".to_string(),
            terrain_mode: TerrainMode::Corners,
            corner_heights: vec![-5.0, -5.0, 5.0, 5.0],
            ..Self::fire_box()
        }
    }

    /// Fire box over a tile tilted down along +X.
    pub fn fire_box_falling() -> Self {
        Self {
            name: "fire-box-falling".to_string(),
            terrain_mode: TerrainMode::Corners,
            corner_heights: vec![5.0, 5.0, -5.0, -5.0],
            ..Self::fire_box()
        }
    }

    /// Single 16×9 quad viewed from a distance.
    pub fn flat_plane() -> Self {
        Self {
            name: "flat-plane".to_string(),
            width: 2,
            length: 2,
            cell_width: 16.0,
            cell_length: 9.0,
            terrain_mode: TerrainMode::Flat,
            vertex_color: None,
            camera_preset: CameraPreset::Overview,
            ..Self::sine_field()
        }
    }

    /// Look up a preset by name (see [`SceneConfig::PRESETS`]).
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().replace('_', "-").as_str() {
            "sine-field" | "sine" => Some(Self::sine_field()),
            "noise-field" | "noise" | "perlin" => Some(Self::noise_field()),
            "fire-box" | "firebox" => Some(Self::fire_box()),
            "fire-box-rising" => Some(Self::fire_box_rising()),
            "fire-box-falling" => Some(Self::fire_box_falling()),
            "flat-plane" | "flat" => Some(Self::flat_plane()),
            _ => None,
        }
    }

    /// Parse a JSON config.
    ///
    /// # Errors
    /// Returns [`FirePlaceError::Config`] if the document is not valid JSON
    /// for this type, or the validation error from [`SceneConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| FirePlaceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    /// Returns [`FirePlaceError::Config`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| FirePlaceError::Config(e.to_string()))
    }

    /// Check ranges that construction would otherwise reject later.
    ///
    /// # Errors
    /// Returns [`FirePlaceError::InvalidArgument`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(FirePlaceError::invalid("width", "must be positive, got 0"));
        }
        if self.length == 0 {
            return Err(FirePlaceError::invalid("length", "must be positive, got 0"));
        }
        FirePlaceError::require_positive("cell_width", self.cell_width)?;
        FirePlaceError::require_positive("cell_length", self.cell_length)?;
        if !(0.0..=1.0).contains(&self.fire_density) {
            return Err(FirePlaceError::invalid(
                "fire_density",
                format!("must be within [0, 1], got {}", self.fire_density),
            ));
        }
        FirePlaceError::require_positive("fire_scale", self.fire_scale)?;
        FirePlaceError::require_positive("ignite_interval", self.ignite_interval)?;
        if let Some(height) = self.fire_box_height {
            FirePlaceError::require_positive("fire_box_height", height)?;
        }
        if self.terrain_mode == TerrainMode::Corners
            && self.corner_heights.len() != self.width.saturating_mul(self.length)
        {
            return Err(FirePlaceError::invalid(
                "corner_heights",
                format!(
                    "expected {} values for a {}x{} grid, got {}",
                    self.width.saturating_mul(self.length),
                    self.width,
                    self.length,
                    self.corner_heights.len()
                ),
            ));
        }
        if let Some(bad) = self.corner_heights.iter().find(|h| !h.is_finite()) {
            return Err(FirePlaceError::invalid(
                "corner_heights",
                format!("must be finite, got {bad}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for name in SceneConfig::PRESETS {
            let config = SceneConfig::preset(name).unwrap();
            assert_eq!(config.name, name);
            config.validate().unwrap();
        }
        assert!(SceneConfig::preset("mystery").is_none());
        assert_eq!(
            SceneConfig::preset("NOISE_FIELD").unwrap().terrain_mode,
            TerrainMode::Noise
        );
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = SceneConfig::from_json_str(
            r#"{ "width": 8, "length": 6, "terrain_mode": "noise", "fire_density": 0.5,
                 "camera_preset": "overview" }"#,
        )
        .unwrap();
        assert_eq!(config.width, 8);
        assert_eq!(config.length, 6);
        assert_eq!(config.terrain_mode, TerrainMode::Noise);
        assert_eq!(config.camera_preset, CameraPreset::Overview);
        assert_eq!(config.cell_width, 1.0);
        assert_eq!(config.fire_scale, DEFAULT_FIRE_SCALE);
    }

    #[test]
    fn test_json_round_trip() {
        let config = SceneConfig::noise_field();
        let json = config.to_json_pretty().unwrap();
        assert_eq!(SceneConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_bad_json_and_bad_values() {
        assert!(matches!(
            SceneConfig::from_json_str("{ not json"),
            Err(FirePlaceError::Config(_))
        ));
        assert!(matches!(
            SceneConfig::from_json_str(r#"{ "fire_density": 2.0 }"#),
            Err(FirePlaceError::InvalidArgument {
                name: "fire_density",
                ..
            })
        ));
        assert!(matches!(
            SceneConfig::from_json_str(r#"{ "width": 0 }"#),
            Err(FirePlaceError::InvalidArgument { name: "width", .. })
        ));
    }

    #[test]
    fn test_corner_heights_must_cover_grid() {
        let rising = SceneConfig::fire_box_rising();
        assert_eq!(rising.terrain_mode, TerrainMode::Corners);
        rising.validate().unwrap();

        let short = SceneConfig {
            corner_heights: vec![1.0, 2.0],
            ..rising
        };
        assert!(matches!(
            short.validate(),
            Err(FirePlaceError::InvalidArgument {
                name: "corner_heights",
                ..
            })
        ));

        let parsed = SceneConfig::from_json_str(
            r#"{ "width": 2, "length": 2, "terrain_mode": "corners",
                 "corner_heights": [0.0, 1.0, 2.0, 3.0] }"#,
        )
        .unwrap();
        assert_eq!(parsed.corner_heights, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_camera_presets() {
        assert_eq!(CameraPreset::Overview.camera().fov_degrees, 30.0);
        assert_eq!(
            CameraPreset::Elevated.camera().target,
            Vec3::new(0.0, 10.0, 0.0)
        );
    }
}
