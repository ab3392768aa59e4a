//! Core types and utilities

pub mod noise;
pub mod vec3;

pub use noise::{flicker_noise, FlameFlicker};
pub use vec3::{Vec2, Vec3};
