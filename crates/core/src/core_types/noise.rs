//! Deterministic noise for fire flicker
//!
//! Fire effects must be a pure function of elapsed time so that advancing a
//! fire twice to the same instant leaves it unchanged. Flicker therefore comes
//! from hashed value noise over (x, z, time) rather than from a random stream.
//!
//! Terrain displacement uses `fastnoise-lite` instead (see
//! [`crate::terrain::NoiseDisplacement`]); this module only covers the small,
//! time-varying signal that drives flame intensity and height.

use crate::core_types::vec3::Vec3;
use serde::{Deserialize, Serialize};

/// Seed values for deterministic noise generation
/// Using prime numbers for better distribution
const SEED_X: u32 = 1619;
const SEED_Z: u32 = 31337;
const SEED_T: u32 = 6971;

/// Seed offset that decorrelates flame height from intensity
const HEIGHT_SEED: u32 = 1013;

/// Maximum value for positive i32 as f64 for safe conversion
const MAX_I32_POSITIVE: f64 = 0x7fff_ffff as f64;

/// Integer hash of a lattice point in (x, z, t) space.
///
/// Returns a value in [0, 1].
#[inline]
fn hash_3d(x: i32, z: i32, t: i32, seed: u32) -> f32 {
    let mut n = (x.wrapping_mul(SEED_X as i32))
        .wrapping_add(z.wrapping_mul(SEED_Z as i32))
        .wrapping_add(t.wrapping_mul(SEED_T as i32))
        .wrapping_add(seed as i32);
    n = (n << 13) ^ n;
    n = n
        .wrapping_mul(n.wrapping_mul(n).wrapping_mul(15731).wrapping_add(789221))
        .wrapping_add(1376312589);
    (f64::from(n & 0x7fff_ffff) / MAX_I32_POSITIVE) as f32
}

/// Smooth interpolation function (Hermite curve)
#[inline]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// 3D value noise over a horizontal position and time.
///
/// Returns a value in [-1, 1] that varies smoothly in space and time.
///
/// # Parameters
/// - `x`, `z`: World coordinates on the terrain plane
/// - `time`: Elapsed time (seconds)
/// - `spatial_scale`: Distance over which neighbouring fires decorrelate
/// - `temporal_scale`: Duration of one flicker cycle (seconds)
/// - `seed`: Seed for different noise layers
pub fn flicker_noise(
    x: f32,
    z: f32,
    time: f32,
    spatial_scale: f32,
    temporal_scale: f32,
    seed: u32,
) -> f32 {
    let sx = x / spatial_scale;
    let sz = z / spatial_scale;
    let st = time / temporal_scale;

    let x0 = sx.floor() as i32;
    let z0 = sz.floor() as i32;
    let t0 = st.floor() as i32;
    let x1 = x0.wrapping_add(1);
    let z1 = z0.wrapping_add(1);
    let t1 = t0.wrapping_add(1);

    let fx = smoothstep(sx - sx.floor());
    let fz = smoothstep(sz - sz.floor());
    let ft = smoothstep(st - st.floor());

    let v000 = hash_3d(x0, z0, t0, seed);
    let v100 = hash_3d(x1, z0, t0, seed);
    let v010 = hash_3d(x0, z1, t0, seed);
    let v110 = hash_3d(x1, z1, t0, seed);

    let v001 = hash_3d(x0, z0, t1, seed);
    let v101 = hash_3d(x1, z0, t1, seed);
    let v011 = hash_3d(x0, z1, t1, seed);
    let v111 = hash_3d(x1, z1, t1, seed);

    // Trilinear interpolation
    let v00 = v000 + fx * (v100 - v000);
    let v10 = v010 + fx * (v110 - v010);
    let v0 = v00 + fz * (v10 - v00);

    let v01 = v001 + fx * (v101 - v001);
    let v11 = v011 + fx * (v111 - v011);
    let v1 = v01 + fz * (v11 - v01);

    let v = v0 + ft * (v1 - v0);

    (v * 2.0 - 1.0).clamp(-1.0, 1.0)
}

/// Flicker model for a single flame
///
/// Produces an intensity multiplier and a height multiplier, both in
/// `[1 - intensity, 1 + intensity]`, as a function of anchor and time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlameFlicker {
    /// Flicker amplitude as a fraction (0.5 = ±50%)
    pub intensity: f32,
    /// Spatial decorrelation distance between neighbouring fires
    pub spatial_scale: f32,
    /// Duration of one flicker cycle (seconds)
    pub temporal_scale: f32,
}

impl Default for FlameFlicker {
    fn default() -> Self {
        Self {
            intensity: 0.5,
            spatial_scale: 4.0,
            temporal_scale: 0.35,
        }
    }
}

impl FlameFlicker {
    /// Brightness multiplier at the given anchor and time
    pub fn intensity_at(&self, anchor: &Vec3, time: f32) -> f32 {
        let noise = flicker_noise(
            anchor.x,
            anchor.z,
            time,
            self.spatial_scale,
            self.temporal_scale,
            0,
        );
        1.0 + noise * self.intensity
    }

    /// Flame height multiplier at the given anchor and time
    pub fn height_at(&self, anchor: &Vec3, time: f32) -> f32 {
        let noise = flicker_noise(
            anchor.x,
            anchor.z,
            time,
            self.spatial_scale * 1.5,
            self.temporal_scale * 0.8,
            HEIGHT_SEED,
        );
        1.0 + noise * self.intensity
    }
}
