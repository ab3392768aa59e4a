//! Vector type aliases for mesh positions, normals and texture coordinates.

use nalgebra::{Vector2, Vector3};

/// 3D vector type for vertex positions, normals and fire anchors.
///
/// This is a simple alias for `nalgebra::Vector3<f32>`. The terrain is laid
/// out in the XZ plane with +Y up.
pub type Vec3 = Vector3<f32>;

/// 2D vector type for texture coordinates and normalized device coordinates.
pub type Vec2 = Vector2<f32>;
