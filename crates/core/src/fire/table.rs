//! Fire placement table
//!
//! One ignition slot per terrain face, plus an unindexed list of ambient
//! fires. Slots follow place-if-absent semantics: igniting an occupied face
//! changes nothing, so a held pointer sweeping over the same face never stacks
//! effects.
//!
//! ```text
//! Empty --try_ignite--> Occupied --try_ignite--> Occupied (no-op)
//!                          |
//!                          +--extinguish--> Empty
//! ```

use crate::core_types::vec3::Vec3;
use crate::error::{FirePlaceError, Result};
use crate::fire::effect::{FireEffect, DEFAULT_FIRE_SCALE};
use crate::terrain::HeightfieldMesh;
use rand::Rng;
use tracing::{debug, info};

/// Ignition slots keyed by face index, plus ambient fires
#[derive(Debug, Clone)]
pub struct FirePlacementTable {
    /// Exactly one slot per mesh face
    slots: Vec<Option<FireEffect>>,
    /// Randomly seeded fires not tied to a face
    ambient: Vec<FireEffect>,
    /// Number of occupied slots
    lit: usize,
    /// Last time passed to `advance`; new fires start here
    elapsed: f32,
    /// Scale given to every fire this table creates
    fire_scale: f32,
}

impl FirePlacementTable {
    /// Create a table with `face_count` empty slots.
    pub fn new(face_count: usize) -> Self {
        Self {
            slots: vec![None; face_count],
            ambient: Vec::new(),
            lit: 0,
            elapsed: 0.0,
            fire_scale: DEFAULT_FIRE_SCALE,
        }
    }

    /// Create a table sized to a mesh's face count.
    pub fn for_mesh(mesh: &HeightfieldMesh) -> Self {
        Self::new(mesh.face_count())
    }

    /// Scale applied to fires created after this call.
    pub fn with_fire_scale(mut self, scale: f32) -> Self {
        self.fire_scale = scale;
        self
    }

    /// Number of slots (the face count the table was built for)
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Check that the table was built for this mesh.
    ///
    /// # Errors
    /// Returns [`FirePlaceError::InvalidArgument`] if the slot count differs
    /// from the mesh's face count.
    pub fn ensure_capacity_matches(&self, mesh: &HeightfieldMesh) -> Result<()> {
        if self.slots.len() == mesh.face_count() {
            Ok(())
        } else {
            Err(FirePlaceError::invalid(
                "capacity",
                format!(
                    "table has {} slots but mesh has {} faces",
                    self.slots.len(),
                    mesh.face_count()
                ),
            ))
        }
    }

    fn slot_mut(&mut self, face_index: usize) -> Result<&mut Option<FireEffect>> {
        let capacity = self.slots.len();
        self.slots.get_mut(face_index).ok_or_else(|| {
            FirePlaceError::invalid(
                "face_index",
                format!("{face_index} out of range for {capacity} slots"),
            )
        })
    }

    /// Light a fire on `face_index` if that face has none.
    ///
    /// Returns `true` when a new fire was placed and `false` when the slot was
    /// already occupied (the existing fire keeps its anchor).
    ///
    /// # Errors
    /// Returns [`FirePlaceError::InvalidArgument`] if `face_index` is not a
    /// slot of this table.
    pub fn try_ignite(&mut self, face_index: usize, anchor: Vec3) -> Result<bool> {
        let elapsed = self.elapsed;
        let scale = self.fire_scale;
        let slot = self.slot_mut(face_index)?;
        if slot.is_some() {
            return Ok(false);
        }

        let mut fire = FireEffect::new(anchor).with_scale(scale);
        fire.advance(elapsed);
        *slot = Some(fire);
        self.lit += 1;

        debug!(
            "Ignited face {} at ({:.2}, {:.2}, {:.2})",
            face_index, anchor.x, anchor.y, anchor.z
        );
        Ok(true)
    }

    /// Remove the fire on `face_index`, returning it if there was one.
    ///
    /// # Errors
    /// Returns [`FirePlaceError::InvalidArgument`] if `face_index` is not a
    /// slot of this table.
    pub fn extinguish(&mut self, face_index: usize) -> Result<Option<FireEffect>> {
        let removed = self.slot_mut(face_index)?.take();
        if removed.is_some() {
            self.lit -= 1;
            debug!("Extinguished face {}", face_index);
        }
        Ok(removed)
    }

    /// Populate ambient fires by independent draws per candidate anchor.
    ///
    /// Each anchor is lit with probability `probability`. Ambient fires are
    /// not keyed by face, so the place-if-absent rule does not apply to them.
    /// Returns the number of fires added.
    ///
    /// # Errors
    /// Returns [`FirePlaceError::InvalidArgument`] if `probability` is outside
    /// `[0, 1]`.
    pub fn random_seed<I, R>(&mut self, probability: f32, anchors: I, rng: &mut R) -> Result<usize>
    where
        I: IntoIterator<Item = Vec3>,
        R: Rng,
    {
        if !(0.0..=1.0).contains(&probability) {
            return Err(FirePlaceError::invalid(
                "probability",
                format!("must be within [0, 1], got {probability}"),
            ));
        }

        let before = self.ambient.len();
        for anchor in anchors {
            // Uniform draw in [0, 1): p = 0 never lights, p = 1 always does
            if rng.random::<f32>() < probability {
                let mut fire = FireEffect::ambient(anchor).with_scale(self.fire_scale);
                fire.advance(self.elapsed);
                self.ambient.push(fire);
            }
        }

        let added = self.ambient.len() - before;
        info!(
            "Seeded {} ambient fires (p = {:.3}, total ambient {})",
            added,
            probability,
            self.ambient.len()
        );
        Ok(added)
    }

    /// Advance every fire to `elapsed` seconds.
    pub fn advance(&mut self, elapsed: f32) {
        self.elapsed = elapsed;
        for fire in self.slots.iter_mut().flatten() {
            fire.advance(elapsed);
        }
        for fire in &mut self.ambient {
            fire.advance(elapsed);
        }
    }

    /// Fire on `face_index`, if any
    pub fn get(&self, face_index: usize) -> Option<&FireEffect> {
        self.slots.get(face_index)?.as_ref()
    }

    /// Whether `face_index` holds a fire
    pub fn is_lit(&self, face_index: usize) -> bool {
        self.get(face_index).is_some()
    }

    /// Number of faces holding a fire
    pub fn lit_count(&self) -> usize {
        self.lit
    }

    /// Ambient fires in seeding order
    pub fn ambient(&self) -> &[FireEffect] {
        &self.ambient
    }

    /// Face-keyed plus ambient fires
    pub fn total_fires(&self) -> usize {
        self.lit + self.ambient.len()
    }

    /// Time of the last advance
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Occupied slots as `(face_index, fire)`
    pub fn iter_lit(&self) -> impl Iterator<Item = (usize, &FireEffect)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(face, slot)| slot.as_ref().map(|fire| (face, fire)))
    }

    /// Every fire, face-keyed first, then ambient
    pub fn iter_all(&self) -> impl Iterator<Item = &FireEffect> {
        self.slots.iter().flatten().chain(&self.ambient)
    }
}
