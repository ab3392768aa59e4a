//! Time-driven fire effect anchored at a point on the terrain.

use crate::core_types::noise::FlameFlicker;
use crate::core_types::vec3::Vec3;
use serde::{Deserialize, Serialize};

/// Uniform scale applied to fire billboards
pub const DEFAULT_FIRE_SCALE: f32 = 20.0;

/// Emitter box for fires lit by the pointer (tall column)
pub const IGNITED_FIRE_EXTENTS: [f32; 3] = [1.0, 5.0, 1.0];

/// Emitter box for ambient fires (unit cube)
pub const AMBIENT_FIRE_EXTENTS: [f32; 3] = [1.0, 1.0, 1.0];

/// A single animated fire.
///
/// All animation state is derived from the anchor and the last elapsed time
/// passed to [`FireEffect::advance`], so advancing twice to the same instant
/// is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireEffect {
    anchor: Vec3,
    extents: Vec3,
    scale: f32,
    flicker: FlameFlicker,
    time: f32,
    intensity: f32,
    height: f32,
}

impl FireEffect {
    /// Fire lit by pointer interaction, with the tall emitter column.
    pub fn new(anchor: Vec3) -> Self {
        Self::with_extents(anchor, Vec3::from(IGNITED_FIRE_EXTENTS))
    }

    /// Ambient fire, with the unit-cube emitter.
    pub fn ambient(anchor: Vec3) -> Self {
        Self::with_extents(anchor, Vec3::from(AMBIENT_FIRE_EXTENTS))
    }

    /// Fire with an arbitrary emitter box.
    pub fn with_extents(anchor: Vec3, extents: Vec3) -> Self {
        let mut fire = Self {
            anchor,
            extents,
            scale: DEFAULT_FIRE_SCALE,
            flicker: FlameFlicker::default(),
            time: 0.0,
            intensity: 1.0,
            height: 1.0,
        };
        fire.advance(0.0);
        fire
    }

    /// Replace the billboard scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Replace the flicker model and re-derive the current state.
    pub fn with_flicker(mut self, flicker: FlameFlicker) -> Self {
        self.flicker = flicker;
        self.advance(self.time);
        self
    }

    /// Set the animation clock to `elapsed` seconds.
    pub fn advance(&mut self, elapsed: f32) {
        self.time = elapsed;
        self.intensity = self.flicker.intensity_at(&self.anchor, elapsed);
        self.height = self.flicker.height_at(&self.anchor, elapsed);
    }

    /// World-space anchor point
    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    /// Emitter box size before scaling
    pub fn extents(&self) -> Vec3 {
        self.extents
    }

    /// Billboard scale
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Elapsed time of the last advance
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Current brightness multiplier
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Current flame height in world units
    pub fn flame_height(&self) -> f32 {
        self.extents.y * self.scale * self.height
    }
}
