//! Grid heightfield mesh construction
//!
//! Builds a triangulated W×L grid in the XZ plane whose vertex elevations come
//! from a caller-supplied height function, together with per-face UVs and
//! face/vertex normals for shading.
//!
//! # Indexing
//!
//! Vertex `(i, j)` lives at index `i * L + j`. Every grid cell `(i, j)` with
//! `i < W - 1`, `j < L - 1` contributes two faces, stored consecutively at
//! face indices `2 * (i * (L - 1) + j)` and `+ 1`. The same stride is used for
//! every corner of both triangles.

use crate::core_types::vec3::{Vec2, Vec3};
use crate::error::{FirePlaceError, Result};
use crate::terrain::displacement::NoiseDisplacement;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Triangle as three vertex indices
pub type Face = [u32; 3];

/// Texture coordinates for the three corners of a face
pub type FaceUvs = [Vec2; 3];

/// Default vertex color (pure red, tinted by the ground texture)
pub const DEFAULT_VERTEX_COLOR: u32 = 0xff0000;

/// Grid heightfield mesh
///
/// Serializes as grid dimensions plus per-vertex heights and colors.
/// Deserializing rebuilds faces, UVs and normals through [`build_heightfield`],
/// so a document with inconsistent sizes is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "HeightfieldRecord", into = "HeightfieldRecord")]
pub struct HeightfieldMesh {
    /// Number of vertices along X
    width: usize,
    /// Number of vertices along Z
    length: usize,
    /// Spacing between vertices along X
    cell_width: f32,
    /// Spacing between vertices along Z
    cell_length: f32,
    /// Vertex positions (index `i * length + j`)
    vertices: Vec<Vec3>,
    /// Triangles, two per grid cell
    faces: Vec<Face>,
    /// Per-face texture coordinates, parallel to `faces`
    uvs: Vec<FaceUvs>,
    /// Optional per-vertex color as 0xRRGGBB
    colors: Option<Vec<u32>>,
    /// Unit normal of each face
    face_normals: Vec<Vec3>,
    /// Averaged unit normal of each vertex
    vertex_normals: Vec<Vec3>,
}

/// Serialized form of a [`HeightfieldMesh`]
#[derive(Serialize, Deserialize)]
struct HeightfieldRecord {
    width: usize,
    length: usize,
    cell_width: f32,
    cell_length: f32,
    heights: Vec<f32>,
    colors: Option<Vec<u32>>,
}

impl From<HeightfieldMesh> for HeightfieldRecord {
    fn from(mesh: HeightfieldMesh) -> Self {
        Self {
            width: mesh.width,
            length: mesh.length,
            cell_width: mesh.cell_width,
            cell_length: mesh.cell_length,
            heights: mesh.vertices.iter().map(|v| v.y).collect(),
            colors: mesh.colors,
        }
    }
}

impl TryFrom<HeightfieldRecord> for HeightfieldMesh {
    type Error = FirePlaceError;

    fn try_from(record: HeightfieldRecord) -> Result<Self> {
        let expected = record.width.saturating_mul(record.length);
        if record.heights.len() != expected {
            return Err(FirePlaceError::invalid(
                "heights",
                format!(
                    "expected {expected} values for a {}x{} grid, got {}",
                    record.width,
                    record.length,
                    record.heights.len()
                ),
            ));
        }
        if let Some(colors) = &record.colors {
            if colors.len() != expected {
                return Err(FirePlaceError::invalid(
                    "colors",
                    format!("expected {expected} values, got {}", colors.len()),
                ));
            }
        }

        let length = record.length;
        let heights = record.heights;
        let mut mesh = build_heightfield(
            record.width,
            length,
            record.cell_width,
            record.cell_length,
            |i, j| heights[i * length + j],
        )?;
        mesh.colors = record.colors;
        Ok(mesh)
    }
}

/// Build a heightfield mesh from grid dimensions and a height function.
///
/// Vertex `(i, j)` is placed at
/// `(cell_width * (i - width / 2), height_fn(i, j), cell_length * (j - length / 2))`
/// so the grid is centered on the origin.
///
/// # Errors
/// Returns [`FirePlaceError::InvalidArgument`] if `width` or `length` is zero,
/// if a cell size is not finite and positive, or if the grid has more vertices
/// than a `u32` face index can address.
pub fn build_heightfield<F>(
    width: usize,
    length: usize,
    cell_width: f32,
    cell_length: f32,
    height_fn: F,
) -> Result<HeightfieldMesh>
where
    F: Fn(usize, usize) -> f32,
{
    if width == 0 {
        return Err(FirePlaceError::invalid("width", "must be positive, got 0"));
    }
    if length == 0 {
        return Err(FirePlaceError::invalid("length", "must be positive, got 0"));
    }
    FirePlaceError::require_positive("cell_width", cell_width)?;
    FirePlaceError::require_positive("cell_length", cell_length)?;

    let vertex_count = width
        .checked_mul(length)
        .filter(|&n| u32::try_from(n).is_ok())
        .ok_or_else(|| {
            FirePlaceError::invalid(
                "width",
                format!("{width}x{length} grid exceeds the u32 vertex index range"),
            )
        })?;

    let half_w = width as f32 / 2.0;
    let half_l = length as f32 / 2.0;

    let mut vertices = Vec::with_capacity(vertex_count);
    for i in 0..width {
        for j in 0..length {
            vertices.push(Vec3::new(
                cell_width * (i as f32 - half_w),
                height_fn(i, j),
                cell_length * (j as f32 - half_l),
            ));
        }
    }

    let face_count = 2 * (width - 1) * (length - 1);
    let mut faces = Vec::with_capacity(face_count);
    let mut uvs = Vec::with_capacity(face_count);

    let w = width as f32;
    let l = length as f32;
    for i in 0..width - 1 {
        for j in 0..length - 1 {
            let base = (i * length + j) as u32;
            let stride = length as u32;

            faces.push([base, base + 1, base + stride]);
            uvs.push([
                Vec2::new(i as f32 / w, j as f32 / l),
                Vec2::new(i as f32 / w, (j + 1) as f32 / l),
                Vec2::new((i + 1) as f32 / w, j as f32 / l),
            ]);

            faces.push([base + stride + 1, base + stride, base + 1]);
            uvs.push([
                Vec2::new((i + 1) as f32 / w, (j + 1) as f32 / l),
                Vec2::new((i + 1) as f32 / w, j as f32 / l),
                Vec2::new(i as f32 / w, (j + 1) as f32 / l),
            ]);
        }
    }

    let (face_normals, vertex_normals) = compute_normals(&vertices, &faces);

    debug!(
        "Built {}x{} heightfield: {} vertices, {} faces",
        width,
        length,
        vertices.len(),
        faces.len()
    );

    Ok(HeightfieldMesh {
        width,
        length,
        cell_width,
        cell_length,
        vertices,
        faces,
        uvs,
        colors: None,
        face_normals,
        vertex_normals,
    })
}

/// Unit normal of triangle `(a, b, c)`: `normalize((b - a) × (c - a))`.
///
/// Degenerate triangles (zero area) report +Y.
#[inline]
pub fn triangle_normal(a: &Vec3, b: &Vec3, c: &Vec3) -> Vec3 {
    (b - a)
        .cross(&(c - a))
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vec3::y)
}

/// Compute per-face and per-vertex normals for an indexed triangle list.
///
/// Vertex normals are the normalized sum of the unit normals of every face
/// touching the vertex. Vertices referenced by no face get +Y.
pub(crate) fn compute_normals(vertices: &[Vec3], faces: &[Face]) -> (Vec<Vec3>, Vec<Vec3>) {
    let face_normals: Vec<Vec3> = faces
        .par_iter()
        .map(|&[a, b, c]| {
            triangle_normal(
                &vertices[a as usize],
                &vertices[b as usize],
                &vertices[c as usize],
            )
        })
        .collect();

    let mut accum = vec![Vec3::zeros(); vertices.len()];
    for (face, normal) in faces.iter().zip(&face_normals) {
        for &v in face {
            accum[v as usize] += normal;
        }
    }

    let vertex_normals = accum
        .into_par_iter()
        .map(|n| n.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::y))
        .collect();

    (face_normals, vertex_normals)
}

impl HeightfieldMesh {
    /// Number of vertices along X
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of vertices along Z
    pub fn length(&self) -> usize {
        self.length
    }

    /// Vertex spacing along X and Z
    pub fn cell_size(&self) -> (f32, f32) {
        (self.cell_width, self.cell_length)
    }

    /// Vertex positions, indexed `i * length + j`
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Triangle index triples
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Per-face texture coordinates, parallel to [`Self::faces`]
    pub fn uvs(&self) -> &[FaceUvs] {
        &self.uvs
    }

    /// Per-vertex colors as 0xRRGGBB, if the mesh has been painted
    pub fn colors(&self) -> Option<&[u32]> {
        self.colors.as_deref()
    }

    /// Unit normal of each face
    pub fn face_normals(&self) -> &[Vec3] {
        &self.face_normals
    }

    /// Unit normal of each vertex
    pub fn vertex_normals(&self) -> &[Vec3] {
        &self.vertex_normals
    }

    /// Total vertex count (`width * length`)
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Total face count (`2 * (width - 1) * (length - 1)`)
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Position of grid vertex `(i, j)`
    pub fn vertex(&self, i: usize, j: usize) -> Option<&Vec3> {
        if i >= self.width || j >= self.length {
            return None;
        }
        self.vertices.get(i * self.length + j)
    }

    /// Index of the first of the two faces covering grid cell `(i, j)`
    pub fn cell_face_index(&self, i: usize, j: usize) -> Option<usize> {
        if i + 1 >= self.width || j + 1 >= self.length {
            return None;
        }
        Some(2 * (i * (self.length - 1) + j))
    }

    /// Grid cell `(i, j)` that a face belongs to
    pub fn face_cell(&self, face_index: usize) -> Option<(usize, usize)> {
        if face_index >= self.faces.len() {
            return None;
        }
        let cell = face_index / 2;
        let row = self.length - 1;
        Some((cell / row, cell % row))
    }

    /// The three corner positions of a face
    pub fn triangle(&self, face_index: usize) -> Option<[Vec3; 3]> {
        let [a, b, c] = *self.faces.get(face_index)?;
        Some([
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ])
    }

    /// Centroid of a face, a convenient fire anchor
    pub fn face_centroid(&self, face_index: usize) -> Option<Vec3> {
        let [a, b, c] = self.triangle(face_index)?;
        Some((a + b + c) / 3.0)
    }

    /// Minimum and maximum vertex elevation
    pub fn elevation_range(&self) -> (f32, f32) {
        self.vertices
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), v| (lo.min(v.y), hi.max(v.y)))
    }

    /// Assign the same color to every vertex
    pub fn paint(&mut self, color: u32) {
        self.colors = Some(vec![color; self.vertices.len()]);
    }

    /// Assign a color per vertex from grid coordinates
    pub fn paint_with<F>(&mut self, color_fn: F)
    where
        F: Fn(usize, usize) -> u32,
    {
        let length = self.length;
        self.colors = Some(
            (0..self.vertices.len())
                .map(|idx| color_fn(idx / length, idx % length))
                .collect(),
        );
    }

    /// Drop per-vertex colors
    pub fn clear_colors(&mut self) {
        self.colors = None;
    }

    /// Overwrite every vertex height from a noise field, then recompute normals.
    ///
    /// # Errors
    /// Returns [`FirePlaceError::InvalidArgument`] if the displacement's
    /// smoothing is not finite and positive or its peak is not finite.
    pub fn displace(&mut self, displacement: &NoiseDisplacement) -> Result<()> {
        let sampler = displacement.sampler()?;
        self.vertices
            .par_iter_mut()
            .for_each(|v| v.y = sampler.height_at(v.x, v.z));
        self.recompute_normals();

        let (lo, hi) = self.elevation_range();
        debug!("Displaced heightfield, elevation range [{lo:.2}, {hi:.2}]");
        Ok(())
    }

    /// Recompute face and vertex normals after vertex positions changed
    pub fn recompute_normals(&mut self) {
        let (face_normals, vertex_normals) = compute_normals(&self.vertices, &self.faces);
        self.face_normals = face_normals;
        self.vertex_normals = vertex_normals;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_json_rebuilds_topology() {
        let mut mesh = build_heightfield(5, 3, 2.0, 1.5, |i, j| (i * 3 + j) as f32 * 0.5).unwrap();
        mesh.paint(DEFAULT_VERTEX_COLOR);
        let json = serde_json::to_string(&mesh).unwrap();
        let restored: HeightfieldMesh = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.vertices(), mesh.vertices());
        assert_eq!(restored.faces(), mesh.faces());
        assert_eq!(restored.uvs(), mesh.uvs());
        assert_eq!(restored.colors(), mesh.colors());
        assert_eq!(restored.face_normals(), mesh.face_normals());
    }

    #[test]
    fn test_json_with_inconsistent_sizes_is_rejected() {
        let short_heights = r#"{ "width": 3, "length": 3, "cell_width": 1.0,
            "cell_length": 1.0, "heights": [0.0, 1.0], "colors": null }"#;
        let err = serde_json::from_str::<HeightfieldMesh>(short_heights).unwrap_err();
        assert!(err.to_string().contains("heights"), "{err}");

        let short_colors = r#"{ "width": 2, "length": 2, "cell_width": 1.0,
            "cell_length": 1.0, "heights": [0.0, 0.0, 0.0, 0.0], "colors": [1] }"#;
        assert!(serde_json::from_str::<HeightfieldMesh>(short_colors).is_err());

        let zero_width = r#"{ "width": 0, "length": 2, "cell_width": 1.0,
            "cell_length": 1.0, "heights": [], "colors": null }"#;
        assert!(serde_json::from_str::<HeightfieldMesh>(zero_width).is_err());
    }

    #[test]
    fn test_flat_four_by_four() {
        let mesh = build_heightfield(4, 4, 1.0, 1.0, |_, _| 0.0).unwrap();
        assert_eq!(mesh.vertex_count(), 16);
        assert_eq!(mesh.face_count(), 18);
        assert_eq!(mesh.uvs().len(), 18);
        assert!(mesh.vertices().iter().all(|v| v.y == 0.0));
        assert!(mesh.colors().is_none());
    }

    #[test]
    fn test_vertex_positions_centered() {
        let mesh = build_heightfield(4, 2, 2.0, 3.0, |i, j| (i * 10 + j) as f32).unwrap();
        // i = 0 → x = 2 * (0 - 2) = -4; j = 1 → z = 3 * (1 - 1) = 0
        let v = mesh.vertex(0, 1).unwrap();
        assert_eq!(*v, Vec3::new(-4.0, 1.0, 0.0));
        let v = mesh.vertex(3, 0).unwrap();
        assert_eq!(*v, Vec3::new(2.0, 30.0, -3.0));
        assert!(mesh.vertex(4, 0).is_none());
    }

    #[test]
    fn test_non_square_faces_use_length_stride() {
        let mesh = build_heightfield(3, 5, 1.0, 1.0, |_, _| 0.0).unwrap();
        assert_eq!(mesh.face_count(), 2 * 2 * 4);

        // Cell (1, 2): base = 1 * 5 + 2 = 7
        let face = mesh.cell_face_index(1, 2).unwrap();
        assert_eq!(mesh.faces()[face], [7, 8, 12]);
        assert_eq!(mesh.faces()[face + 1], [13, 12, 8]);

        let vertex_count = mesh.vertex_count() as u32;
        assert!(mesh.faces().iter().flatten().all(|&v| v < vertex_count));
    }

    #[test]
    fn test_face_cell_round_trip() {
        let mesh = build_heightfield(6, 4, 1.0, 1.0, |_, _| 0.0).unwrap();
        for i in 0..5 {
            for j in 0..3 {
                let face = mesh.cell_face_index(i, j).unwrap();
                assert_eq!(mesh.face_cell(face), Some((i, j)));
                assert_eq!(mesh.face_cell(face + 1), Some((i, j)));
            }
        }
        assert!(mesh.cell_face_index(5, 0).is_none());
        assert!(mesh.face_cell(mesh.face_count()).is_none());
    }

    #[test]
    fn test_uvs_match_cell_corners() {
        let mesh = build_heightfield(4, 4, 1.0, 1.0, |_, _| 0.0).unwrap();
        let face = mesh.cell_face_index(1, 2).unwrap();
        let [a, b, c] = mesh.uvs()[face];
        assert_eq!(a, Vec2::new(0.25, 0.5));
        assert_eq!(b, Vec2::new(0.25, 0.75));
        assert_eq!(c, Vec2::new(0.5, 0.5));
        let [a, b, c] = mesh.uvs()[face + 1];
        assert_eq!(a, Vec2::new(0.5, 0.75));
        assert_eq!(b, Vec2::new(0.5, 0.5));
        assert_eq!(c, Vec2::new(0.25, 0.75));
    }

    #[test]
    fn test_flat_normals_point_up() {
        let mesh = build_heightfield(5, 3, 1.5, 0.5, |_, _| -2.0).unwrap();
        for n in mesh.face_normals().iter().chain(mesh.vertex_normals()) {
            assert_relative_eq!(*n, Vec3::y(), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_single_row_has_no_faces() {
        let mesh = build_heightfield(1, 7, 1.0, 1.0, |_, _| 0.0).unwrap();
        assert_eq!(mesh.vertex_count(), 7);
        assert_eq!(mesh.face_count(), 0);
        assert!(mesh.vertex_normals().iter().all(|n| *n == Vec3::y()));
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        assert!(matches!(
            build_heightfield(0, 4, 1.0, 1.0, |_, _| 0.0),
            Err(FirePlaceError::InvalidArgument { name: "width", .. })
        ));
        assert!(matches!(
            build_heightfield(4, 0, 1.0, 1.0, |_, _| 0.0),
            Err(FirePlaceError::InvalidArgument { name: "length", .. })
        ));
        assert!(matches!(
            build_heightfield(4, 4, 0.0, 1.0, |_, _| 0.0),
            Err(FirePlaceError::InvalidArgument { name: "cell_width", .. })
        ));
        assert!(matches!(
            build_heightfield(4, 4, 1.0, f32::NAN, |_, _| 0.0),
            Err(FirePlaceError::InvalidArgument { name: "cell_length", .. })
        ));
    }

    #[test]
    fn test_paint_with_grid_coordinates() {
        let mut mesh = build_heightfield(2, 3, 1.0, 1.0, |_, _| 0.0).unwrap();
        mesh.paint(DEFAULT_VERTEX_COLOR);
        assert!(mesh.colors().unwrap().iter().all(|&c| c == 0xff0000));

        mesh.paint_with(|i, j| (i * 16 + j) as u32);
        assert_eq!(mesh.colors().unwrap(), &[0, 1, 2, 16, 17, 18]);

        mesh.clear_colors();
        assert!(mesh.colors().is_none());
    }

    #[test]
    fn test_degenerate_triangle_normal_defaults_up() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(triangle_normal(&p, &p, &p), Vec3::y());
    }
}
