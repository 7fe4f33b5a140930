//! Mesh extraction pipeline.
//!
//! [`MeshExtractor::extract`] walks a fixed sequence of steps: type check,
//! topology, UVs, normals, per-frame vertex baking, subdivision tags. The
//! first mandatory read that fails stops the pipeline; whatever was
//! gathered so far is returned as [`Extraction::Partial`] together with the
//! reason, which is also traced and appended to the caller's log.

use thiserror::Error;

use crate::config::ReaderConfig;
use crate::core::{SceneReader, TimeCode};
use crate::geom::mesh::{attr, IMesh};
use crate::geom::snapshot::MeshSnapshot;
use crate::geom::subdiv::{BoundaryInterpolation, FaceVaryingInterpolation, SubdivScheme};
use crate::geom::uv;
use crate::util::{self, Chrono, DMat4, Error};

/// What to extract from a mesh prim.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtractRequest {
    /// UV set (primvar name) to resolve; empty for none.
    pub uv_set: String,
    /// Frames to bake, in order.
    pub frames: Vec<i32>,
    /// Re-base transforms onto `reference`.
    pub keep_centered: bool,
    /// Reference prim for centering. `None` re-bases onto the scene root,
    /// which leaves world transforms unchanged.
    pub reference: Option<String>,
}

impl ExtractRequest {
    /// Request for the given frames, no UVs, world space.
    pub fn new(frames: impl Into<Vec<i32>>) -> Self {
        Self {
            frames: frames.into(),
            ..Default::default()
        }
    }

    /// Resolve a UV set.
    pub fn with_uv_set(mut self, uv_set: impl Into<String>) -> Self {
        self.uv_set = uv_set.into();
        self
    }

    /// Bake vertices relative to `reference` instead of world space.
    pub fn centered_on(mut self, reference: impl Into<String>) -> Self {
        self.keep_centered = true;
        self.reference = Some(reference.into());
        self
    }
}

/// Reason an extraction stopped early. The display text is the log line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    #[error("Invalid non-mesh prim {path} of type {type_name}")]
    NonMesh { path: String, type_name: String },

    #[error("Failed getting face vertex indices on {0}")]
    MissingFaceIndices(String),

    #[error("Failed getting face counts on {0}")]
    MissingFaceCounts(String),

    #[error("Discarding invalid uv set {uv_set} on {path}")]
    InvalidUvSet { uv_set: String, path: String },

    #[error("Discarding because Vertex or Facevarying interpolation is not defined for the {uv_set} uv set on {path}")]
    UnsupportedUvSet { uv_set: String, path: String },

    #[error("Discarding because could not read uvs on {0}")]
    UnreadableUvs(String),

    #[error("Failed getting vertices on {name} at frame {frame}")]
    MissingPoints { name: String, frame: i32 },

    #[error("Failed computing transform for {path} at frame {frame}: {reason}")]
    Transform { path: String, frame: i32, reason: String },
}

/// Outcome of an extraction.
#[derive(Clone, Debug, PartialEq)]
pub enum Extraction {
    /// Every step ran.
    Complete(MeshSnapshot),
    /// Stopped at `error`; `snapshot` holds what was gathered before it.
    Partial { snapshot: MeshSnapshot, error: ExtractError },
}

impl Extraction {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    /// The snapshot, complete or not.
    pub fn snapshot(&self) -> &MeshSnapshot {
        match self {
            Self::Complete(s) | Self::Partial { snapshot: s, .. } => s,
        }
    }

    pub fn into_snapshot(self) -> MeshSnapshot {
        match self {
            Self::Complete(s) | Self::Partial { snapshot: s, .. } => s,
        }
    }

    /// Why extraction stopped, if it did.
    pub fn error(&self) -> Option<&ExtractError> {
        match self {
            Self::Complete(_) => None,
            Self::Partial { error, .. } => Some(error),
        }
    }

    /// Shorthand for `snapshot().is_valid()`.
    pub fn is_valid(&self) -> bool {
        self.snapshot().is_valid()
    }
}

/// Extracts [`MeshSnapshot`]s from a scene.
pub struct MeshExtractor<'a, S: SceneReader + ?Sized> {
    stage: &'a S,
    config: &'a ReaderConfig,
}

impl<'a, S: SceneReader + ?Sized> MeshExtractor<'a, S> {
    pub fn new(stage: &'a S, config: &'a ReaderConfig) -> Self {
        Self { stage, config }
    }

    /// Extract the mesh at `path`, appending diagnostics to `log`.
    #[tracing::instrument(level = "debug", skip_all, fields(path = %path))]
    pub fn extract(&self, path: &str, request: &ExtractRequest, log: &mut Vec<String>) -> Extraction {
        let mut snapshot = MeshSnapshot::new();
        match self.build(path, request, &mut snapshot) {
            Ok(()) => Extraction::Complete(snapshot),
            Err(error) => {
                tracing::warn!("{}", error);
                log.push(error.to_string());
                Extraction::Partial { snapshot, error }
            }
        }
    }

    fn build(&self, path: &str, request: &ExtractRequest, out: &mut MeshSnapshot) -> Result<(), ExtractError> {
        let mesh = IMesh::new(self.stage, path).ok_or_else(|| ExtractError::NonMesh {
            path: path.to_string(),
            type_name: self.stage.type_name(path).unwrap_or_default().to_string(),
        })?;

        let topology_time = mesh.topology_time();
        tracing::info!(
            topology_varying = !topology_time.is_default(),
            "reading mesh {}",
            path
        );

        out.vertex_indices = mesh
            .face_vertex_indices(topology_time)
            .map_err(|e| read_failed(e, ExtractError::MissingFaceIndices(path.to_string())))?;
        out.face_counts = mesh
            .face_vertex_counts(topology_time)
            .map_err(|e| read_failed(e, ExtractError::MissingFaceCounts(path.to_string())))?;
        out.face_selection_indices = util::identity_indices(out.face_counts.len());

        if !request.uv_set.is_empty() {
            self.read_uvs(&mesh, &request.uv_set, topology_time, out)?;
        }

        // Normals are optional.
        if let Ok(normals) = mesh.normals(topology_time) {
            out.normals = util::flatten_vec3(&normals);
            out.normal_indices = util::identity_indices(out.vertex_indices.len());
        }

        for &frame in &request.frames {
            let points = mesh.points(TimeCode::from(frame)).map_err(|e| {
                read_failed(e, ExtractError::MissingPoints { name: mesh.name().to_string(), frame })
            })?;
            let mut flat = util::flatten_vec3(&points);
            let xform = self
                .frame_transform(&mesh, request, frame as Chrono)
                .map_err(|e| ExtractError::Transform {
                    path: path.to_string(),
                    frame,
                    reason: e.to_string(),
                })?;
            if !util::is_identity(&xform) {
                util::transform_points_in_place(&mut flat, &xform);
            }
            out.vertices.insert(frame, flat);
        }

        trace_summary(out);
        self.read_subdiv(&mesh, out);
        Ok(())
    }

    fn read_uvs(
        &self,
        mesh: &IMesh<'_, S>,
        uv_set: &str,
        time: TimeCode,
        out: &mut MeshSnapshot,
    ) -> Result<(), ExtractError> {
        let path = mesh.path();
        let info = mesh.primvar(uv_set).ok_or_else(|| ExtractError::InvalidUvSet {
            uv_set: uv_set.to_string(),
            path: path.to_string(),
        })?;
        if !uv::is_uv_primvar(&info, self.config.read_float2_as_uv) {
            return Err(ExtractError::UnsupportedUvSet {
                uv_set: uv_set.to_string(),
                path: path.to_string(),
            });
        }

        let values = self
            .stage
            .read_primvar(path, uv_set, time)
            .and_then(|v| v.cast::<Vec<util::Vec2>>())
            .map_err(|e| read_failed(e, ExtractError::UnreadableUvs(path.to_string())))?;

        out.uv_indices = match self.stage.read_primvar_indices(path, uv_set, time) {
            Ok(indices) => indices,
            // No index array: one value per corner.
            Err(_) => util::identity_indices(out.vertex_indices.len()),
        };
        out.uvs = util::flatten_vec2(&values);
        Ok(())
    }

    fn frame_transform(&self, mesh: &IMesh<'_, S>, request: &ExtractRequest, time: Chrono) -> crate::util::Result<DMat4> {
        let world = mesh.local_to_world(time)?;
        if !request.keep_centered {
            return Ok(world);
        }
        let Some(reference) = request.reference.as_deref() else {
            return Ok(world);
        };
        let reference_world = self.stage.local_to_world(reference, time)?;
        if reference_world.determinant() == 0.0 {
            return Err(Error::SingularTransform(reference.to_string()));
        }
        Ok(reference_world.inverse() * world)
    }

    fn read_subdiv(&self, mesh: &IMesh<'_, S>, out: &mut MeshSnapshot) {
        if let Ok(v) = mesh.int_array(attr::CREASE_INDICES) {
            out.crease_indices = v;
        }
        if let Ok(v) = mesh.int_array(attr::CREASE_LENGTHS) {
            out.crease_lengths = v;
        }
        if let Ok(v) = mesh.float_array(attr::CREASE_SHARPNESSES) {
            out.crease_sharpness = v;
        }
        if let Ok(v) = mesh.int_array(attr::CORNER_INDICES) {
            out.corner_indices = v;
        }
        if let Ok(v) = mesh.float_array(attr::CORNER_SHARPNESSES) {
            out.corner_sharpness = v;
        }
        if let Ok(v) = mesh.int_array(attr::HOLE_INDICES) {
            out.hole_indices = v;
        }

        let Ok(scheme) = mesh.subdivision_scheme() else {
            return;
        };
        out.subdivision_scheme = SubdivScheme::from_token(&scheme);
        if !out.subdivision_scheme.is_subdivision() {
            return;
        }
        if let Ok(token) = mesh.token(attr::INTERPOLATE_BOUNDARY) {
            out.interpolate_boundary = BoundaryInterpolation::from_token(&token);
        }
        if let Ok(token) = mesh.token(attr::FACE_VARYING_LINEAR_INTERPOLATION) {
            out.face_varying_linear_interpolation = FaceVaryingInterpolation::from_token(&token);
        }
    }
}

/// Convenience wrapper around [`MeshExtractor::extract`].
pub fn extract_mesh<S>(
    stage: &S,
    path: &str,
    request: &ExtractRequest,
    config: &ReaderConfig,
    log: &mut Vec<String>,
) -> Extraction
where
    S: SceneReader + ?Sized,
{
    MeshExtractor::new(stage, config).extract(path, request, log)
}

fn read_failed(cause: Error, error: ExtractError) -> ExtractError {
    tracing::debug!(%cause, "read failed");
    error
}

fn trace_summary(s: &MeshSnapshot) {
    tracing::trace!(
        faces = s.face_counts.len(),
        vertex_indices = s.vertex_indices.len(),
        frames = s.vertices.len(),
        first_frame_vertices = s.vertices.values().next().map_or(0, |v| v.len() / 3),
        uvs = s.uvs.len() / 2,
        uv_indices = s.uv_indices.len(),
        normals = s.normals.len() / 3,
        normal_indices = s.normal_indices.len(),
        "mesh summary"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let r = ExtractRequest::new([1, 2]).with_uv_set("st").centered_on("/world");
        assert_eq!(r.frames, vec![1, 2]);
        assert_eq!(r.uv_set, "st");
        assert!(r.keep_centered);
        assert_eq!(r.reference.as_deref(), Some("/world"));
    }

    #[test]
    fn test_error_lines() {
        let e = ExtractError::InvalidUvSet { uv_set: "st".into(), path: "/m".into() };
        assert_eq!(e.to_string(), "Discarding invalid uv set st on /m");

        let e = ExtractError::MissingPoints { name: "m".into(), frame: 3 };
        assert!(e.to_string().contains("frame 3"));
    }

    #[test]
    fn test_extraction_accessors() {
        let partial = Extraction::Partial {
            snapshot: MeshSnapshot::new(),
            error: ExtractError::MissingFaceCounts("/m".into()),
        };
        assert!(!partial.is_complete());
        assert!(!partial.is_valid());
        assert!(matches!(partial.error(), Some(ExtractError::MissingFaceCounts(_))));

        let complete = Extraction::Complete(MeshSnapshot::new());
        assert!(complete.is_complete());
        assert!(complete.error().is_none());
    }
}
