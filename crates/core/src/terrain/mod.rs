//! Procedural terrain: grid heightfields, height profiles, noise
//! displacement and fire box extrusion.

pub mod displacement;
pub mod fire_box;
pub mod heightfield;
pub mod profile;

pub use displacement::{NoiseDisplacement, NoiseKind};
pub use fire_box::{fire_box, fire_volume, VolumeMesh, DEFAULT_FIRE_BOX_HEIGHT};
pub use heightfield::{
    build_heightfield, triangle_normal, Face, FaceUvs, HeightfieldMesh, DEFAULT_VERTEX_COLOR,
};
pub use profile::{HeightProfile, SineWave};
