//! Pointer picking against a heightfield.
//!
//! Resolves a pick ray to the terrain faces it crosses. Triangles are tested
//! double-sided with the Möller–Trumbore algorithm, and hits are ordered
//! nearest first.

use crate::config::Camera;
use crate::core_types::vec3::{Vec2, Vec3};
use crate::error::{FirePlaceError, Result};
use crate::terrain::HeightfieldMesh;
use rayon::prelude::*;

/// Determinant below which a ray is treated as parallel to a triangle
const PARALLEL_EPSILON: f32 = 1e-7;

/// Minimum hit distance, so a ray starting on the surface does not hit itself
const MIN_HIT_DISTANCE: f32 = 1e-5;

/// Half-line with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

/// A face crossed by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Index of the face that was hit
    pub face_index: usize,
    /// World-space intersection point
    pub point: Vec3,
    /// Distance from the ray origin
    pub distance: f32,
}

impl Ray {
    /// Create a ray; `direction` is normalized.
    ///
    /// # Errors
    /// Returns [`FirePlaceError::InvalidArgument`] if `direction` has zero
    /// length or any component is not finite.
    pub fn new(origin: Vec3, direction: Vec3) -> Result<Self> {
        let direction = direction
            .try_normalize(f32::EPSILON)
            .filter(|d| d.iter().all(|c| c.is_finite()))
            .ok_or_else(|| {
                FirePlaceError::invalid(
                    "direction",
                    format!(
                        "must be finite and non-zero, got ({}, {}, {})",
                        direction.x, direction.y, direction.z
                    ),
                )
            })?;
        Ok(Self { origin, direction })
    }

    /// Pick ray through a point in normalized device coordinates.
    ///
    /// `ndc` spans `[-1, 1]` on both axes with +Y up; `aspect` is viewport
    /// width over height.
    ///
    /// # Errors
    /// Returns [`FirePlaceError::InvalidArgument`] if the camera looks along
    /// its own up vector, has a non-positive field of view, or `aspect` is not
    /// finite and positive.
    pub fn from_camera(camera: &Camera, ndc: Vec2, aspect: f32) -> Result<Self> {
        FirePlaceError::require_positive("aspect", aspect)?;
        FirePlaceError::require_positive("fov_degrees", camera.fov_degrees)?;

        let forward = (camera.target - camera.position)
            .try_normalize(f32::EPSILON)
            .ok_or_else(|| FirePlaceError::invalid("target", "coincides with camera position"))?;
        let right = forward
            .cross(&camera.up)
            .try_normalize(f32::EPSILON)
            .ok_or_else(|| FirePlaceError::invalid("up", "parallel to view direction"))?;
        let up = right.cross(&forward);

        let half = (camera.fov_degrees.to_radians() / 2.0).tan();
        let direction = forward + right * (ndc.x * half * aspect) + up * (ndc.y * half);
        Self::new(camera.position, direction)
    }

    /// Ray origin
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Unit direction
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance to triangle `(a, b, c)` if the ray crosses it from either side.
    pub fn intersect_triangle(&self, a: &Vec3, b: &Vec3, c: &Vec3) -> Option<f32> {
        let e1 = b - a;
        let e2 = c - a;
        let p = self.direction.cross(&e2);
        let det = e1.dot(&p);
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let s = self.origin - a;
        let u = s.dot(&p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&e1);
        let v = self.direction.dot(&q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e2.dot(&q) * inv_det;
        (t > MIN_HIT_DISTANCE).then_some(t)
    }
}

/// Every face the ray crosses, nearest first.
pub fn raycast_all(mesh: &HeightfieldMesh, ray: &Ray) -> Vec<RayHit> {
    let vertices = mesh.vertices();
    let mut hits: Vec<RayHit> = mesh
        .faces()
        .par_iter()
        .enumerate()
        .filter_map(|(face_index, &[a, b, c])| {
            let distance = ray.intersect_triangle(
                &vertices[a as usize],
                &vertices[b as usize],
                &vertices[c as usize],
            )?;
            Some(RayHit {
                face_index,
                point: ray.at(distance),
                distance,
            })
        })
        .collect();
    hits.sort_by(|x, y| x.distance.total_cmp(&y.distance));
    hits
}

/// Nearest face the ray crosses, if any.
pub fn raycast_mesh(mesh: &HeightfieldMesh, ray: &Ray) -> Option<RayHit> {
    raycast_all(mesh, ray).into_iter().next()
}
