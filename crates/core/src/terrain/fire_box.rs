//! Fire box volumes extruded from terrain faces.
//!
//! A fire box is a closed triangular prism standing on one terrain face, used
//! as the emitter volume for a volumetric fire. `fire_volume` merges the boxes
//! of every face into one welded mesh covering the whole terrain.

use crate::core_types::vec3::Vec3;
use crate::error::{FirePlaceError, Result};
use crate::terrain::heightfield::{compute_normals, Face, HeightfieldMesh};
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

/// Default prism height above the terrain surface
pub const DEFAULT_FIRE_BOX_HEIGHT: f32 = 10.0;

/// Prism triangles over vertices `[a, b, c, a', b', c']` (primes are raised)
const PRISM_FACES: [Face; 8] = [
    [0, 1, 2],
    [0, 1, 3],
    [1, 3, 4],
    [1, 2, 4],
    [2, 4, 5],
    [2, 0, 5],
    [0, 5, 3],
    [3, 4, 5],
];

/// Indexed triangle mesh for fire emitter volumes
#[derive(Debug, Clone, Default, Serialize)]
pub struct VolumeMesh {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    face_normals: Vec<Vec3>,
    vertex_normals: Vec<Vec3>,
}

impl VolumeMesh {
    fn from_parts(vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        let (face_normals, vertex_normals) = compute_normals(&vertices, &faces);
        Self {
            vertices,
            faces,
            face_normals,
            vertex_normals,
        }
    }

    /// Vertex positions
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Triangle index triples
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Unit normal of each face
    pub fn face_normals(&self) -> &[Vec3] {
        &self.face_normals
    }

    /// Unit normal of each vertex
    pub fn vertex_normals(&self) -> &[Vec3] {
        &self.vertex_normals
    }

    /// Number of welded vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles, eight per extruded face
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Whether the volume has no triangles
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

fn prism_corners(mesh: &HeightfieldMesh, face_index: usize, height: f32) -> Result<[Vec3; 6]> {
    let [a, b, c] = mesh.triangle(face_index).ok_or_else(|| {
        FirePlaceError::invalid(
            "face_index",
            format!(
                "{face_index} out of range for mesh with {} faces",
                mesh.face_count()
            ),
        )
    })?;
    let lift = Vec3::new(0.0, height, 0.0);
    Ok([a, b, c, a + lift, b + lift, c + lift])
}

/// Extrude a single terrain face into a closed prism of the given height.
///
/// # Errors
/// Returns [`FirePlaceError::InvalidArgument`] if `face_index` is out of range
/// or `height` is not finite and positive.
pub fn fire_box(mesh: &HeightfieldMesh, face_index: usize, height: f32) -> Result<VolumeMesh> {
    FirePlaceError::require_positive("height", height)?;
    let corners = prism_corners(mesh, face_index, height)?;
    Ok(VolumeMesh::from_parts(corners.to_vec(), PRISM_FACES.to_vec()))
}

/// Extrude every terrain face and merge the prisms, welding shared corners.
///
/// # Errors
/// Returns [`FirePlaceError::InvalidArgument`] if `height` is not finite and
/// positive.
pub fn fire_volume(mesh: &HeightfieldMesh, height: f32) -> Result<VolumeMesh> {
    FirePlaceError::require_positive("height", height)?;

    let mut welded: FxHashMap<[u32; 3], u32> = FxHashMap::default();
    let mut vertices = Vec::new();
    let mut faces = Vec::with_capacity(mesh.face_count() * PRISM_FACES.len());

    for face_index in 0..mesh.face_count() {
        let corners = prism_corners(mesh, face_index, height)?;
        let mut remap = [0u32; 6];
        for (slot, corner) in remap.iter_mut().zip(corners) {
            // + 0.0 folds -0.0 onto 0.0 so both weld together
            let key = [
                (corner.x + 0.0).to_bits(),
                (corner.y + 0.0).to_bits(),
                (corner.z + 0.0).to_bits(),
            ];
            *slot = *welded.entry(key).or_insert_with(|| {
                vertices.push(corner);
                (vertices.len() - 1) as u32
            });
        }
        faces.extend(
            PRISM_FACES
                .iter()
                .map(|&[a, b, c]| [remap[a as usize], remap[b as usize], remap[c as usize]]),
        );
    }

    debug!(
        "Fire volume: {} prisms, {} welded vertices",
        mesh.face_count(),
        vertices.len()
    );
    Ok(VolumeMesh::from_parts(vertices, faces))
}
