//! Flattened mesh snapshot produced by extraction.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::geom::subdiv::{BoundaryInterpolation, FaceVaryingInterpolation, SubdivScheme};

/// Frame-indexed, renderer-agnostic mesh data.
///
/// Built once by [`MeshExtractor`](crate::geom::MeshExtractor) and holds no
/// reference back to the scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshSnapshot {
    pub(crate) vertex_indices: Vec<i32>,
    pub(crate) face_counts: Vec<i32>,
    pub(crate) face_selection_indices: Vec<i32>,
    /// Baked `x, y, z` triples per frame.
    pub(crate) vertices: BTreeMap<i32, Vec<f32>>,
    pub(crate) normals: Vec<f32>,
    pub(crate) normal_indices: Vec<i32>,
    pub(crate) uvs: Vec<f32>,
    pub(crate) uv_indices: Vec<i32>,

    pub(crate) subdivision_scheme: SubdivScheme,
    pub(crate) interpolate_boundary: BoundaryInterpolation,
    pub(crate) face_varying_linear_interpolation: FaceVaryingInterpolation,
    pub(crate) crease_indices: Vec<i32>,
    pub(crate) crease_lengths: Vec<i32>,
    pub(crate) crease_sharpness: Vec<f32>,
    pub(crate) corner_indices: Vec<i32>,
    pub(crate) corner_sharpness: Vec<f32>,
    pub(crate) hole_indices: Vec<i32>,
}

impl MeshSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Usable only with at least one non-empty frame and non-empty
    /// vertex indices.
    pub fn is_valid(&self) -> bool {
        !self.vertex_indices.is_empty() && self.vertices.values().any(|v| !v.is_empty())
    }

    /// Clear every sequence and restore subdivision defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn vertex_indices(&self) -> &[i32] {
        &self.vertex_indices
    }

    pub fn face_counts(&self) -> &[i32] {
        &self.face_counts
    }

    pub fn face_selection_indices(&self) -> &[i32] {
        &self.face_selection_indices
    }

    /// Get number of faces.
    pub fn num_faces(&self) -> usize {
        self.face_counts.len()
    }

    /// All baked frames, keyed by frame number.
    pub fn vertices(&self) -> &BTreeMap<i32, Vec<f32>> {
        &self.vertices
    }

    /// Frame numbers present, ascending.
    pub fn frames(&self) -> impl Iterator<Item = i32> + '_ {
        self.vertices.keys().copied()
    }

    /// Vertex triples for `frame`.
    ///
    /// A frame that was not baked falls back to the lowest baked frame;
    /// `None` only when nothing was baked.
    pub fn vertices_at(&self, frame: i32) -> Option<&[f32]> {
        self.vertices
            .get(&frame)
            .or_else(|| self.vertices.values().next())
            .map(Vec::as_slice)
    }

    /// Vertex count at `frame` (with the same fallback as
    /// [`vertices_at`](Self::vertices_at)).
    pub fn num_vertices(&self, frame: i32) -> usize {
        self.vertices_at(frame).map_or(0, |v| v.len() / 3)
    }

    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    pub fn normal_indices(&self) -> &[i32] {
        &self.normal_indices
    }

    /// Check if the source carried normals.
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    pub fn uvs(&self) -> &[f32] {
        &self.uvs
    }

    pub fn uv_indices(&self) -> &[i32] {
        &self.uv_indices
    }

    /// Check if a UV set was resolved.
    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty()
    }

    /// Check if the mesh is a subdivision surface.
    pub fn is_subdiv_mesh(&self) -> bool {
        self.subdivision_scheme.is_subdivision()
    }

    /// Scheme tag.
    pub fn scheme(&self) -> SubdivScheme {
        self.subdivision_scheme
    }

    /// Scheme name (`catmullClark`, `loop`, `bilinear` or empty).
    pub fn subdivision_scheme(&self) -> &'static str {
        self.subdivision_scheme.name()
    }

    /// Boundary interpolation tag.
    pub fn boundary(&self) -> BoundaryInterpolation {
        self.interpolate_boundary
    }

    /// Boundary interpolation code.
    pub fn interpolate_boundary(&self) -> i32 {
        self.interpolate_boundary.code()
    }

    /// Face-varying interpolation tag.
    pub fn face_varying(&self) -> FaceVaryingInterpolation {
        self.face_varying_linear_interpolation
    }

    /// Face-varying linear interpolation code.
    pub fn face_varying_linear_interpolation(&self) -> i32 {
        self.face_varying_linear_interpolation.code()
    }

    /// Corner propagation flag.
    pub fn propagate_corner(&self) -> i32 {
        self.face_varying_linear_interpolation.propagate_corner()
    }

    pub fn crease_indices(&self) -> &[i32] {
        &self.crease_indices
    }

    pub fn crease_lengths(&self) -> &[i32] {
        &self.crease_lengths
    }

    pub fn crease_sharpness(&self) -> &[f32] {
        &self.crease_sharpness
    }

    pub fn corner_indices(&self) -> &[i32] {
        &self.corner_indices
    }

    pub fn corner_sharpness(&self) -> &[f32] {
        &self.corner_sharpness
    }

    pub fn hole_indices(&self) -> &[i32] {
        &self.hole_indices
    }
}

// Subdivision tags serialize as the accessor values: scheme name plus
// integer codes.
impl Serialize for MeshSnapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("MeshSnapshot", 19)?;
        state.serialize_field("vertexIndices", &self.vertex_indices)?;
        state.serialize_field("faceCounts", &self.face_counts)?;
        state.serialize_field("faceSelectionIndices", &self.face_selection_indices)?;
        state.serialize_field("vertices", &self.vertices)?;
        state.serialize_field("normals", &self.normals)?;
        state.serialize_field("normalIndices", &self.normal_indices)?;
        state.serialize_field("uvs", &self.uvs)?;
        state.serialize_field("uvIndices", &self.uv_indices)?;
        state.serialize_field("isSubdivMesh", &self.is_subdiv_mesh())?;
        state.serialize_field("subdivisionScheme", self.subdivision_scheme())?;
        state.serialize_field("interpolateBoundary", &self.interpolate_boundary())?;
        state.serialize_field("faceVaryingLinearInterpolation", &self.face_varying_linear_interpolation())?;
        state.serialize_field("propagateCorner", &self.propagate_corner())?;
        state.serialize_field("creaseIndices", &self.crease_indices)?;
        state.serialize_field("creaseLengths", &self.crease_lengths)?;
        state.serialize_field("creaseSharpness", &self.crease_sharpness)?;
        state.serialize_field("cornerIndices", &self.corner_indices)?;
        state.serialize_field("cornerSharpness", &self.corner_sharpness)?;
        state.serialize_field("holeIndices", &self.hole_indices)?;
        state.end()
    }
}
