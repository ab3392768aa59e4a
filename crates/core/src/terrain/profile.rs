//! Height profiles used to seed heightfield elevations.

use crate::error::{FirePlaceError, Result};
use crate::terrain::heightfield::{build_heightfield, HeightfieldMesh};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Sine ridges running along Z: `base + amplitude * sin(PI * i / period)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SineWave {
    /// Elevation of the wave's midline
    pub base: f32,
    /// Peak deviation from the midline
    pub amplitude: f32,
    /// Number of grid columns per half wavelength
    pub period: f32,
}

impl Default for SineWave {
    fn default() -> Self {
        Self {
            base: -10.0,
            amplitude: 1.0,
            period: 12.5,
        }
    }
}

impl SineWave {
    /// Elevation at grid column `i`
    #[inline]
    pub fn height_at(&self, i: usize) -> f32 {
        self.base + self.amplitude * (PI * i as f32 / self.period).sin()
    }
}

/// How vertex elevations are assigned before any displacement pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightProfile {
    /// Every vertex at the same elevation
    Flat {
        /// Elevation of the plane
        elevation: f32,
    },
    /// Sine ridges along the X axis
    Sine(SineWave),
    /// Explicit elevation per vertex, in `i * length + j` order
    Corners(Vec<f32>),
}

impl Default for HeightProfile {
    fn default() -> Self {
        Self::Flat { elevation: 0.0 }
    }
}

impl HeightProfile {
    /// Build a heightfield with this profile.
    ///
    /// # Errors
    /// Returns [`FirePlaceError::InvalidArgument`] for invalid grid dimensions
    /// (see [`build_heightfield`]), a sine period that is not finite and
    /// positive, or a `Corners` list whose length is not `width * length`.
    pub fn build(
        &self,
        width: usize,
        length: usize,
        cell_width: f32,
        cell_length: f32,
    ) -> Result<HeightfieldMesh> {
        match self {
            Self::Flat { elevation } => {
                let elevation = *elevation;
                build_heightfield(width, length, cell_width, cell_length, |_, _| elevation)
            }
            Self::Sine(wave) => {
                FirePlaceError::require_positive("period", wave.period)?;
                build_heightfield(width, length, cell_width, cell_length, |i, _| {
                    wave.height_at(i)
                })
            }
            Self::Corners(heights) => {
                let expected = width.saturating_mul(length);
                if heights.len() != expected {
                    return Err(FirePlaceError::invalid(
                        "heights",
                        format!(
                            "expected {expected} values for a {width}x{length} grid, got {}",
                            heights.len()
                        ),
                    ));
                }
                build_heightfield(width, length, cell_width, cell_length, |i, j| {
                    heights[i * length + j]
                })
            }
        }
    }
}
