//! In-memory scene stage.
//!
//! [`MemoryStage`] is a [`SceneReader`] over prims held in a map keyed by
//! absolute path. It is built programmatically or loaded from a JSON
//! document (see [`document`]).

pub mod document;

use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::Path;

use smallvec::SmallVec;

use crate::core::{Interpolation, PrimvarInfo, SceneReader, TimeCode, TimeSamples, Value, ValueTypeName};
use crate::geom::mesh::{attr, MESH_TYPE};
use crate::geom::XformSample;
use crate::util::{Chrono, DMat4, Error, Result, Vec3};

pub use document::StageDocument;

/// Root path.
pub const ROOT: &str = "/";

/// Parent of an absolute path; `None` for the root.
pub fn parent_path(path: &str) -> Option<&str> {
    if path == ROOT {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some(ROOT),
        Some(i) => Some(&path[..i]),
        None => None,
    }
}

/// A primvar: declaration plus time-sampled values and optional indices.
#[derive(Clone, Debug, PartialEq)]
pub struct Primvar {
    pub type_name: ValueTypeName,
    pub interpolation: Interpolation,
    pub element_size: i32,
    pub values: TimeSamples<Value>,
    pub indices: TimeSamples<Vec<i32>>,
}

impl Primvar {
    pub fn new(type_name: ValueTypeName, interpolation: Interpolation) -> Self {
        Self {
            type_name,
            interpolation,
            element_size: 1,
            values: TimeSamples::new(),
            indices: TimeSamples::new(),
        }
    }

    /// Set the default values.
    pub fn set_values(&mut self, values: Value) -> &mut Self {
        self.values.set_default(values);
        self
    }

    /// Set values at `time`.
    pub fn set_values_at(&mut self, time: Chrono, values: Value) -> &mut Self {
        self.values.set(time, values);
        self
    }

    /// Set the default index array.
    pub fn set_indices(&mut self, indices: Vec<i32>) -> &mut Self {
        self.indices.set_default(indices);
        self
    }

    /// Set the index array at `time`.
    pub fn set_indices_at(&mut self, time: Chrono, indices: Vec<i32>) -> &mut Self {
        self.indices.set(time, indices);
        self
    }

    pub fn set_element_size(&mut self, element_size: i32) -> &mut Self {
        self.element_size = element_size;
        self
    }
}

/// A prim on a [`MemoryStage`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Prim {
    pub type_name: String,
    pub attributes: BTreeMap<String, TimeSamples<Value>>,
    pub primvars: BTreeMap<String, Primvar>,
    pub xform: TimeSamples<XformSample>,
    /// Ignore ancestor transforms.
    pub reset_xform_stack: bool,
}

impl Prim {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    /// Set the default value of an attribute.
    pub fn set_attribute(&mut self, name: &str, value: Value) -> &mut Self {
        self.attributes.entry(name.to_string()).or_default().set_default(value);
        self
    }

    /// Set an attribute time sample.
    pub fn set_attribute_at(&mut self, name: &str, time: Chrono, value: Value) -> &mut Self {
        self.attributes.entry(name.to_string()).or_default().set(time, value);
        self
    }

    /// Declare a primvar (replacing any previous declaration) and return
    /// it for population.
    pub fn add_primvar(
        &mut self,
        name: &str,
        type_name: ValueTypeName,
        interpolation: Interpolation,
    ) -> &mut Primvar {
        let slot = self
            .primvars
            .entry(name.to_string())
            .or_insert_with(|| Primvar::new(type_name, interpolation));
        *slot = Primvar::new(type_name, interpolation);
        slot
    }

    /// Set the default local transform.
    pub fn set_xform(&mut self, xform: XformSample) -> &mut Self {
        self.xform.set_default(xform);
        self
    }

    /// Set a local transform time sample.
    pub fn set_xform_at(&mut self, time: Chrono, xform: XformSample) -> &mut Self {
        self.xform.set(time, xform);
        self
    }

    pub fn set_reset_xform_stack(&mut self, reset: bool) -> &mut Self {
        self.reset_xform_stack = reset;
        self
    }

    /// Local transform at `time`; identity when none is authored.
    pub fn local_transform(&self, time: Chrono) -> Result<DMat4> {
        match self.xform.value_at(TimeCode::At(time), |a, b, t| a.lerp(b, t)) {
            Some(sample) => sample.matrix(),
            None => Ok(DMat4::IDENTITY),
        }
    }
}

/// Scene held entirely in memory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStage {
    prims: BTreeMap<String, Prim>,
}

impl MemoryStage {
    /// Create an empty stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a stage from a JSON document on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        tracing::debug!("loading stage {}", path.display());
        Self::from_json_str(&text)
    }

    /// Parse a stage from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let doc: StageDocument = serde_json::from_str(text)?;
        doc.into_stage()
    }

    /// Define (or redefine the type of) a prim, creating typeless
    /// ancestors as needed.
    pub fn define_prim(&mut self, path: &str, type_name: &str) -> &mut Prim {
        let mut parent = parent_path(path);
        while let Some(p) = parent {
            if p == ROOT {
                break;
            }
            self.prims.entry(p.to_string()).or_default();
            parent = parent_path(p);
        }
        let prim = self.prims.entry(path.to_string()).or_default();
        prim.type_name = type_name.to_string();
        prim
    }

    /// Define a mesh prim with constant topology and points.
    pub fn define_mesh(&mut self, path: &str, points: Vec<Vec3>, counts: Vec<i32>, indices: Vec<i32>) -> &mut Prim {
        self.define_prim(path, MESH_TYPE)
            .set_attribute(attr::POINTS, Value::Point3fArray(points))
            .set_attribute(attr::FACE_VERTEX_COUNTS, Value::IntArray(counts))
            .set_attribute(attr::FACE_VERTEX_INDICES, Value::IntArray(indices))
    }

    pub fn prim(&self, path: &str) -> Option<&Prim> {
        self.prims.get(path)
    }

    pub fn prim_mut(&mut self, path: &str) -> Option<&mut Prim> {
        self.prims.get_mut(path)
    }

    /// All prim paths, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.prims.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.prims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prims.is_empty()
    }

    fn get(&self, path: &str) -> Result<&Prim> {
        self.prims.get(path).ok_or_else(|| Error::PrimNotFound(path.to_string()))
    }

    fn get_primvar(&self, path: &str, name: &str) -> Result<&Primvar> {
        self.get(path)?
            .primvars
            .get(name)
            .ok_or_else(|| Error::missing_attribute(path, &format!("primvars:{}", name)))
    }
}

fn no_value(prim: &str, name: &str, time: TimeCode) -> Error {
    Error::NoValue {
        prim: prim.to_string(),
        name: name.to_string(),
        time: time.to_string(),
    }
}

impl SceneReader for MemoryStage {
    fn type_name(&self, path: &str) -> Result<&str> {
        Ok(self.get(path)?.type_name.as_str())
    }

    fn children(&self, path: &str) -> Vec<String> {
        let prefix = if path == ROOT { ROOT.to_string() } else { format!("{}/", path) };
        // Descendants sort contiguously after the prefix.
        self.prims
            .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
            .map(|(p, _)| p)
            .take_while(|p| p.starts_with(&prefix))
            .filter(|p| p.len() > prefix.len() && !p[prefix.len()..].contains('/'))
            .cloned()
            .collect()
    }

    fn num_time_samples(&self, path: &str, attr: &str) -> usize {
        self.prims
            .get(path)
            .and_then(|p| p.attributes.get(attr))
            .map_or(0, TimeSamples::num_samples)
    }

    fn read_attribute(&self, path: &str, attr: &str, time: TimeCode) -> Result<Value> {
        let samples = self
            .get(path)?
            .attributes
            .get(attr)
            .ok_or_else(|| Error::missing_attribute(path, attr))?;
        samples
            .value_at(time, |a, b, t| a.lerp(b, t))
            .map(|v| v.into_owned())
            .ok_or_else(|| no_value(path, attr, time))
    }

    fn primvars(&self, path: &str) -> Vec<PrimvarInfo> {
        let Some(prim) = self.prims.get(path) else {
            return Vec::new();
        };
        prim.primvars
            .iter()
            .map(|(name, pv)| PrimvarInfo {
                name: name.clone(),
                type_name: pv.type_name,
                interpolation: pv.interpolation,
                element_size: pv.element_size,
                indexed: !pv.indices.is_empty(),
            })
            .collect()
    }

    fn read_primvar(&self, path: &str, name: &str, time: TimeCode) -> Result<Value> {
        self.get_primvar(path, name)?
            .values
            .value_at(time, |a, b, t| a.lerp(b, t))
            .map(|v| v.into_owned())
            .ok_or_else(|| no_value(path, name, time))
    }

    fn read_primvar_indices(&self, path: &str, name: &str, time: TimeCode) -> Result<Vec<i32>> {
        // Indices are held, never interpolated.
        self.get_primvar(path, name)?
            .indices
            .value_at(time, |_, _, _| None)
            .map(|v| v.into_owned())
            .ok_or_else(|| no_value(path, &format!("{}:indices", name), time))
    }

    fn local_to_world(&self, path: &str, time: Chrono) -> Result<DMat4> {
        self.get(path)?;
        let mut chain: SmallVec<[&str; 8]> = SmallVec::new();
        let mut current = Some(path);
        while let Some(p) = current {
            chain.push(p);
            current = parent_path(p);
        }

        let mut world = DMat4::IDENTITY;
        for p in chain.iter().rev() {
            let Some(prim) = self.prims.get(*p) else {
                continue;
            };
            let local = prim.local_transform(time)?;
            world = if prim.reset_xform_stack { local } else { world * local };
        }
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::XformOp;
    use crate::util::DVec3;

    fn translate(x: f64, y: f64, z: f64) -> XformSample {
        XformSample::from_ops(vec![XformOp::translate(x, y, z)])
    }

    #[test]
    fn test_parent_path() {
        assert_eq!(parent_path("/"), None);
        assert_eq!(parent_path("/a"), Some("/"));
        assert_eq!(parent_path("/a/b/c"), Some("/a/b"));
    }

    #[test]
    fn test_children_are_direct_only() {
        let mut stage = MemoryStage::new();
        stage.define_prim("/a/b/c", "Xform");
        stage.define_prim("/a/b2", "Xform");
        stage.define_prim("/ab/x", "Xform");
        stage.define_prim("/a-b", "Xform");

        assert_eq!(stage.children("/"), vec!["/a", "/a-b", "/ab"]);
        assert_eq!(stage.children("/a"), vec!["/a/b", "/a/b2"]);
        assert_eq!(stage.children("/a/b"), vec!["/a/b/c"]);
        assert!(stage.children("/a/b/c").is_empty());
        assert!(stage.children("/missing").is_empty());
    }

    #[test]
    fn test_define_creates_ancestors() {
        let mut stage = MemoryStage::new();
        stage.define_prim("/world/geo/mesh", MESH_TYPE);
        assert_eq!(stage.type_name("/world/geo").unwrap(), "");
        assert_eq!(stage.children("/"), vec!["/world"]);
        assert_eq!(stage.children("/world"), vec!["/world/geo"]);
        assert_eq!(stage.children("/world/geo"), vec!["/world/geo/mesh"]);
        assert!(stage.children("/world/geo/mesh").is_empty());
    }

    #[test]
    fn test_attribute_resolution() {
        let mut stage = MemoryStage::new();
        stage
            .define_prim("/m", MESH_TYPE)
            .set_attribute("a", Value::FloatArray(vec![-1.0]))
            .set_attribute_at("a", 1.0, Value::FloatArray(vec![0.0]))
            .set_attribute_at("a", 3.0, Value::FloatArray(vec![4.0]));

        let read = |t: TimeCode| stage.read_attribute("/m", "a", t).unwrap().cast::<Vec<f32>>().unwrap();
        assert_eq!(read(TimeCode::Default), vec![-1.0]);
        assert_eq!(read(TimeCode::EarliestTime), vec![0.0]);
        assert_eq!(read(TimeCode::At(2.0)), vec![2.0]);
        assert_eq!(read(TimeCode::At(10.0)), vec![4.0]);
        assert_eq!(stage.num_time_samples("/m", "a"), 2);
        assert_eq!(stage.num_time_samples("/m", "missing"), 0);
    }

    #[test]
    fn test_missing_reads() {
        let mut stage = MemoryStage::new();
        stage.define_prim("/m", MESH_TYPE).set_attribute_at("a", 1.0, Value::Int(1));

        assert!(matches!(stage.type_name("/nope"), Err(Error::PrimNotFound(_))));
        assert!(matches!(
            stage.read_attribute("/m", "b", TimeCode::Default),
            Err(Error::AttributeNotFound { .. })
        ));
        // Samples only: nothing at default time.
        assert!(matches!(
            stage.read_attribute("/m", "a", TimeCode::Default),
            Err(Error::NoValue { .. })
        ));
        assert!(stage.read_primvar("/m", "st", TimeCode::Default).is_err());
    }

    #[test]
    fn test_primvar_indices_held() {
        let mut stage = MemoryStage::new();
        stage
            .define_prim("/m", MESH_TYPE)
            .add_primvar("st", ValueTypeName::TexCoord2fArray, Interpolation::FaceVarying)
            .set_indices_at(1.0, vec![0, 0, 0])
            .set_indices_at(3.0, vec![2, 2, 2]);

        let info = stage.primvar("/m", "st").unwrap();
        assert!(info.indexed);
        assert_eq!(info.element_size, 1);
        assert_eq!(stage.read_primvar_indices("/m", "st", TimeCode::At(2.0)).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_local_to_world_composes_ancestors() {
        let mut stage = MemoryStage::new();
        stage.define_prim("/a", "Xform").set_xform(translate(1.0, 0.0, 0.0));
        stage.define_prim("/a/b", "Xform").set_xform(XformSample::from_ops(vec![XformOp::scale(2.0, 2.0, 2.0)]));
        stage.define_prim("/a/b/c", MESH_TYPE).set_xform(translate(0.0, 1.0, 0.0));

        let m = stage.local_to_world("/a/b/c", 1.0).unwrap();
        // Child translation is scaled by the parent, then offset.
        assert_eq!(m.transform_point3(DVec3::ZERO), DVec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_reset_xform_stack() {
        let mut stage = MemoryStage::new();
        stage.define_prim("/a", "Xform").set_xform(translate(5.0, 0.0, 0.0));
        stage
            .define_prim("/a/m", MESH_TYPE)
            .set_xform(translate(0.0, 0.0, 1.0))
            .set_reset_xform_stack(true);

        let m = stage.local_to_world("/a/m", 1.0).unwrap();
        assert_eq!(m.transform_point3(DVec3::ZERO), DVec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_animated_xform() {
        let mut stage = MemoryStage::new();
        stage
            .define_prim("/a", "Xform")
            .set_xform_at(0.0, translate(0.0, 0.0, 0.0))
            .set_xform_at(10.0, translate(10.0, 0.0, 0.0));

        let m = stage.local_to_world("/a", 5.0).unwrap();
        assert_eq!(m.transform_point3(DVec3::ZERO), DVec3::new(5.0, 0.0, 0.0));
        assert!(matches!(stage.local_to_world("/b", 0.0), Err(Error::PrimNotFound(_))));
    }
}
