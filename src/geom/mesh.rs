//! Mesh schema access over a [`SceneReader`].

use crate::core::{FromValue, PrimvarInfo, SceneReader, TimeCode};
use crate::util::{Chrono, DMat4, Error, Result, Vec3};

/// Mesh prim type name.
pub const MESH_TYPE: &str = "Mesh";

/// Geometric prim type names (prims that can carry primvars).
pub const GPRIM_TYPES: &[&str] = &[
    "Mesh", "Points", "BasisCurves", "NurbsCurves", "NurbsPatch",
    "Cube", "Sphere", "Cylinder", "Cone", "Capsule", "Plane",
];

/// Mesh attribute names.
pub mod attr {
    pub const FACE_VERTEX_INDICES: &str = "faceVertexIndices";
    pub const FACE_VERTEX_COUNTS: &str = "faceVertexCounts";
    pub const POINTS: &str = "points";
    pub const NORMALS: &str = "normals";
    pub const CREASE_INDICES: &str = "creaseIndices";
    pub const CREASE_LENGTHS: &str = "creaseLengths";
    pub const CREASE_SHARPNESSES: &str = "creaseSharpnesses";
    pub const CORNER_INDICES: &str = "cornerIndices";
    pub const CORNER_SHARPNESSES: &str = "cornerSharpnesses";
    pub const HOLE_INDICES: &str = "holeIndices";
    pub const SUBDIVISION_SCHEME: &str = "subdivisionScheme";
    pub const INTERPOLATE_BOUNDARY: &str = "interpolateBoundary";
    pub const FACE_VARYING_LINEAR_INTERPOLATION: &str = "faceVaryingLinearInterpolation";
}

/// Schema fallback for an unauthored `subdivisionScheme`.
pub const SUBDIVISION_SCHEME_FALLBACK: &str = "catmullClark";

/// Check if a type name is a geometric prim.
pub fn is_gprim_type(type_name: &str) -> bool {
    GPRIM_TYPES.contains(&type_name)
}

/// Input mesh schema reader.
pub struct IMesh<'a, S: SceneReader + ?Sized> {
    stage: &'a S,
    path: &'a str,
}

impl<'a, S: SceneReader + ?Sized> IMesh<'a, S> {
    /// Wrap a prim as an IMesh.
    /// Returns None if the prim is missing or not mesh-typed.
    pub fn new(stage: &'a S, path: &'a str) -> Option<Self> {
        match stage.type_name(path) {
            Ok(t) if t == MESH_TYPE => Some(Self { stage, path }),
            _ => None,
        }
    }

    /// Get the full path.
    pub fn path(&self) -> &'a str {
        self.path
    }

    /// Get the prim name (last path component).
    pub fn name(&self) -> &'a str {
        self.path.rsplit('/').next().unwrap_or(self.path)
    }

    /// Topology changes over time when face indices carry more than one
    /// time sample.
    pub fn is_topology_varying(&self) -> bool {
        self.stage.num_time_samples(self.path, attr::FACE_VERTEX_INDICES) > 1
    }

    /// Time at which topology-bound attributes are read: the earliest
    /// sample for varying topology, otherwise the default.
    pub fn topology_time(&self) -> TimeCode {
        if self.is_topology_varying() {
            TimeCode::EarliestTime
        } else {
            TimeCode::Default
        }
    }

    fn read<T: FromValue>(&self, name: &str, time: TimeCode) -> Result<T> {
        self.stage.read_attribute(self.path, name, time)?.cast()
    }

    /// Per-corner vertex indices.
    pub fn face_vertex_indices(&self, time: TimeCode) -> Result<Vec<i32>> {
        self.read(attr::FACE_VERTEX_INDICES, time)
    }

    /// Corner count per face.
    pub fn face_vertex_counts(&self, time: TimeCode) -> Result<Vec<i32>> {
        self.read(attr::FACE_VERTEX_COUNTS, time)
    }

    /// Point positions.
    pub fn points(&self, time: TimeCode) -> Result<Vec<Vec3>> {
        self.read(attr::POINTS, time)
    }

    /// Normals.
    pub fn normals(&self, time: TimeCode) -> Result<Vec<Vec3>> {
        self.read(attr::NORMALS, time)
    }

    /// Read an integer array attribute at the default time.
    pub fn int_array(&self, name: &str) -> Result<Vec<i32>> {
        self.read(name, TimeCode::Default)
    }

    /// Read a float array attribute at the default time.
    pub fn float_array(&self, name: &str) -> Result<Vec<f32>> {
        self.read(name, TimeCode::Default)
    }

    /// Read a token attribute at the default time.
    pub fn token(&self, name: &str) -> Result<String> {
        self.read(name, TimeCode::Default)
    }

    /// Subdivision scheme token. Unauthored schemes resolve to
    /// [`SUBDIVISION_SCHEME_FALLBACK`]; other read errors propagate.
    pub fn subdivision_scheme(&self) -> Result<String> {
        match self.token(attr::SUBDIVISION_SCHEME) {
            Err(Error::AttributeNotFound { .. } | Error::NoValue { .. }) => {
                Ok(SUBDIVISION_SCHEME_FALLBACK.to_string())
            }
            other => other,
        }
    }

    /// Primvar declaration by name.
    pub fn primvar(&self, name: &str) -> Option<PrimvarInfo> {
        self.stage.primvar(self.path, name)
    }

    /// Underlying scene.
    pub fn stage(&self) -> &'a S {
        self.stage
    }

    /// Local-to-world transform at `time`.
    pub fn local_to_world(&self, time: Chrono) -> Result<DMat4> {
        self.stage.local_to_world(self.path, time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;
    use crate::stage::MemoryStage;

    fn quad(stage: &mut MemoryStage) {
        stage.define_mesh("/m", vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![3], vec![0, 1, 2]);
    }

    #[test]
    fn test_subdivision_scheme_fallback() {
        let mut stage = MemoryStage::new();
        quad(&mut stage);
        let mesh = IMesh::new(&stage, "/m").unwrap();
        assert_eq!(mesh.subdivision_scheme().unwrap(), "catmullClark");
        // Only the scheme has a fallback.
        assert!(mesh.token(attr::INTERPOLATE_BOUNDARY).is_err());

        stage
            .prim_mut("/m")
            .unwrap()
            .set_attribute(attr::SUBDIVISION_SCHEME, Value::Token("none".into()));
        let mesh = IMesh::new(&stage, "/m").unwrap();
        assert_eq!(mesh.subdivision_scheme().unwrap(), "none");
    }

    #[test]
    fn test_subdivision_scheme_type_mismatch() {
        let mut stage = MemoryStage::new();
        quad(&mut stage);
        stage
            .prim_mut("/m")
            .unwrap()
            .set_attribute(attr::SUBDIVISION_SCHEME, Value::IntArray(vec![1]));
        let mesh = IMesh::new(&stage, "/m").unwrap();
        assert!(matches!(mesh.subdivision_scheme(), Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn test_topology_time() {
        let mut stage = MemoryStage::new();
        quad(&mut stage);
        let mesh = IMesh::new(&stage, "/m").unwrap();
        assert!(!mesh.is_topology_varying());
        assert_eq!(mesh.topology_time(), TimeCode::Default);

        let prim = stage.prim_mut("/m").unwrap();
        prim.set_attribute_at(attr::FACE_VERTEX_INDICES, 1.0, Value::IntArray(vec![0, 1, 2]));
        prim.set_attribute_at(attr::FACE_VERTEX_INDICES, 2.0, Value::IntArray(vec![0, 2, 1]));
        let mesh = IMesh::new(&stage, "/m").unwrap();
        assert!(mesh.is_topology_varying());
        assert_eq!(mesh.topology_time(), TimeCode::EarliestTime);
    }
}
