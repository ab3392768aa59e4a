//! Noise-based vertex displacement for organic terrain.
//!
//! Samples a 2D gradient noise field at `(x / smoothing, z / smoothing)` and
//! scales it by a peak amplitude, replacing each vertex's elevation.

use crate::error::{FirePlaceError, Result};
use fastnoise_lite::{FastNoiseLite, NoiseType};
use serde::{Deserialize, Serialize};

/// Gradient noise flavour used for displacement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseKind {
    /// `OpenSimplex2` gradient noise
    #[default]
    Simplex,
    /// Classic Perlin gradient noise
    Perlin,
}

impl NoiseKind {
    fn noise_type(self) -> NoiseType {
        match self {
            Self::Simplex => NoiseType::OpenSimplex2,
            Self::Perlin => NoiseType::Perlin,
        }
    }
}

/// Displacement settings: `offset + peak * noise(x / smoothing, z / smoothing)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseDisplacement {
    /// Noise flavour
    pub kind: NoiseKind,
    /// Maximum deviation from `offset`
    pub peak: f32,
    /// Horizontal distance covered by one noise unit (larger = gentler hills)
    pub smoothing: f32,
    /// Elevation the noise oscillates around
    pub offset: f32,
    /// Noise seed
    pub seed: i32,
}

impl Default for NoiseDisplacement {
    fn default() -> Self {
        Self {
            kind: NoiseKind::Simplex,
            peak: 30.0,
            smoothing: 300.0,
            offset: -30.0,
            seed: 1337,
        }
    }
}

impl NoiseDisplacement {
    /// Elevation at a single horizontal position.
    ///
    /// Builds a fresh sampler each call; prefer
    /// [`crate::terrain::HeightfieldMesh::displace`] for whole meshes.
    ///
    /// # Errors
    /// Returns [`FirePlaceError::InvalidArgument`] if the settings are invalid.
    pub fn height_at(&self, x: f32, z: f32) -> Result<f32> {
        Ok(self.sampler()?.height_at(x, z))
    }

    pub(crate) fn sampler(&self) -> Result<NoiseSampler> {
        FirePlaceError::require_positive("smoothing", self.smoothing)?;
        if !self.peak.is_finite() {
            return Err(FirePlaceError::invalid(
                "peak",
                format!("must be finite, got {}", self.peak),
            ));
        }
        if !self.offset.is_finite() {
            return Err(FirePlaceError::invalid(
                "offset",
                format!("must be finite, got {}", self.offset),
            ));
        }

        let mut noise = FastNoiseLite::with_seed(self.seed);
        noise.set_noise_type(Some(self.kind.noise_type()));
        // Coordinates are pre-scaled by `smoothing`
        noise.set_frequency(Some(1.0));

        Ok(NoiseSampler {
            noise,
            peak: self.peak,
            inv_smoothing: 1.0 / self.smoothing,
            offset: self.offset,
        })
    }
}

/// Configured noise field ready for repeated sampling
pub(crate) struct NoiseSampler {
    noise: FastNoiseLite,
    peak: f32,
    inv_smoothing: f32,
    offset: f32,
}

impl NoiseSampler {
    #[inline]
    pub(crate) fn height_at(&self, x: f32, z: f32) -> f32 {
        let n = self
            .noise
            .get_noise_2d(x * self.inv_smoothing, z * self.inv_smoothing);
        self.offset + self.peak * n
    }
}
