//! Fireplace Core Library
//!
//! Terrain and fire placement model for interactive fire scenes, independent
//! of any rendering API.
//!
//! - **Terrain**: grid heightfield meshes (sine, flat, per-vertex or
//!   noise-displaced) with UVs and face/vertex normals, plus fire box volumes
//!   extruded from terrain faces
//! - **Fires**: a per-face placement table with place-if-absent ignition,
//!   random ambient seeding and time-driven flicker
//! - **Interaction**: pointer pick rays, ray/mesh hit testing and a
//!   fixed-cadence igniter for a held pointer
//! - **Scenes**: one configurable bootstrap covering every scene preset
//!
//! ## Example
//!
//! ```
//! use fireplace_core::{build_heightfield, FirePlacementTable, Vec3};
//!
//! let mesh = build_heightfield(4, 4, 1.0, 1.0, |_, _| 0.0).unwrap();
//! assert_eq!(mesh.face_count(), 18);
//!
//! let mut fires = FirePlacementTable::for_mesh(&mesh);
//! assert!(fires.try_ignite(0, Vec3::zeros()).unwrap());
//! assert!(!fires.try_ignite(0, Vec3::new(1.0, 1.0, 1.0)).unwrap());
//! fires.advance(0.5);
//! ```

// Core types and utilities
pub mod core_types;
pub mod error;

pub mod config;
pub mod fire;
pub mod picking;
pub mod scene;
pub mod terrain;

pub use core_types::{Vec2, Vec3};
pub use error::{FirePlaceError, Result};

pub use config::{Camera, CameraPreset, SceneConfig, TerrainMode};
pub use fire::{FireEffect, FirePlacementTable, IgnitionTimer};
pub use picking::{raycast_all, raycast_mesh, Ray, RayHit};
pub use scene::{FrameReport, Scene};
pub use terrain::{
    build_heightfield, fire_box, fire_volume, HeightProfile, HeightfieldMesh, NoiseDisplacement,
    NoiseKind, SineWave, VolumeMesh,
};
