//! JSON stage document.
//!
//! ```json
//! {
//!   "prims": [
//!     { "path": "/world", "type": "Xform",
//!       "xform": { "default": [ { "type": "translate", "values": [0, 1, 0] } ] } },
//!     { "path": "/world/tri", "type": "Mesh",
//!       "attributes": {
//!         "faceVertexCounts": { "type": "int[]", "default": [3] },
//!         "faceVertexIndices": { "type": "int[]", "default": [0, 1, 2] },
//!         "points": { "type": "point3f[]",
//!                     "timeSamples": { "1": [[0,0,0], [1,0,0], [0,1,0]] } }
//!       },
//!       "primvars": {
//!         "st": { "type": "texCoord2f[]", "interpolation": "faceVarying",
//!                 "default": [[0,0], [1,0], [0,1]],
//!                 "indices": { "default": [0, 1, 2] } }
//!       } }
//!   ]
//! }
//! ```
//!
//! Time-sample keys are decimal strings. Values are plain JSON: numbers,
//! strings, and nested arrays for vector types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{Interpolation, TimeSamples, Value, ValueTypeName};
use crate::geom::{XformOp, XformSample};
use crate::stage::{MemoryStage, Prim, Primvar};
use crate::util::{Chrono, Error, Result, Vec2, Vec3};

/// Top-level document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageDocument {
    pub prims: Vec<PrimDocument>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PrimDocument {
    pub path: String,
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeDocument>,
    #[serde(default)]
    pub primvars: BTreeMap<String, PrimvarDocument>,
    #[serde(default)]
    pub xform: Option<SampledDocument<Vec<XformOp>>>,
    #[serde(default)]
    pub reset_xform_stack: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AttributeDocument {
    #[serde(rename = "type")]
    pub type_name: ValueTypeName,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub time_samples: BTreeMap<String, serde_json::Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PrimvarDocument {
    #[serde(rename = "type")]
    pub type_name: ValueTypeName,
    #[serde(default)]
    pub interpolation: Interpolation,
    #[serde(default = "default_element_size")]
    pub element_size: i32,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub time_samples: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub indices: Option<SampledDocument<Vec<i32>>>,
}

fn default_element_size() -> i32 {
    1
}

/// A default value plus string-keyed time samples of an already typed
/// payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SampledDocument<T> {
    #[serde(default = "Option::default")]
    pub default: Option<T>,
    #[serde(default = "BTreeMap::default")]
    pub time_samples: BTreeMap<String, T>,
}

impl StageDocument {
    /// Build a stage. Prims are defined in document order; a later entry for
    /// the same path overrides the earlier one's type and adds to it.
    pub fn into_stage(self) -> Result<MemoryStage> {
        let mut stage = MemoryStage::new();
        for doc in self.prims {
            if !doc.path.starts_with('/') {
                return Err(Error::invalid(format!("prim path {:?} is not absolute", doc.path)));
            }
            let prim = stage.define_prim(&doc.path, &doc.type_name);
            doc.apply(prim)?;
        }
        tracing::debug!(prims = stage.len(), "stage document loaded");
        Ok(stage)
    }
}

impl PrimDocument {
    fn apply(self, prim: &mut Prim) -> Result<()> {
        let path = self.path;
        for (name, a) in self.attributes {
            let location = format!("{}.{}", path, name);
            prim.attributes
                .insert(name, sampled_values(a.type_name, a.default, a.time_samples, &location)?);
        }
        for (name, p) in self.primvars {
            let location = format!("{}.primvars:{}", path, name);
            let mut primvar = Primvar::new(p.type_name, p.interpolation);
            primvar.element_size = p.element_size;
            primvar.values = sampled_values(p.type_name, p.default, p.time_samples, &location)?;
            if let Some(indices) = p.indices {
                primvar.indices = sampled(indices, &location, Ok)?;
            }
            prim.primvars.insert(name, primvar);
        }
        if let Some(xform) = self.xform {
            prim.xform = sampled(xform, &path, |ops| Ok(XformSample::from_ops(ops)))?;
        }
        prim.reset_xform_stack = self.reset_xform_stack;
        Ok(())
    }
}

fn parse_time(key: &str, location: &str) -> Result<Chrono> {
    // `f64::from_str` accepts "NaN" and "inf"; sample keys must be finite.
    key.trim()
        .parse::<Chrono>()
        .ok()
        .filter(|t| t.is_finite())
        .ok_or_else(|| Error::invalid(format!("bad time sample key {:?} on {}", key, location)))
}

fn sampled<T, U, F>(doc: SampledDocument<T>, location: &str, convert: F) -> Result<TimeSamples<U>>
where
    F: Fn(T) -> Result<U>,
{
    let mut out = TimeSamples::new();
    if let Some(v) = doc.default {
        out.set_default(convert(v)?);
    }
    for (key, v) in doc.time_samples {
        out.set(parse_time(&key, location)?, convert(v)?);
    }
    Ok(out)
}

fn sampled_values(
    type_name: ValueTypeName,
    default: Option<serde_json::Value>,
    time_samples: BTreeMap<String, serde_json::Value>,
    location: &str,
) -> Result<TimeSamples<Value>> {
    sampled(SampledDocument { default, time_samples }, location, |json| {
        match value_from_json(type_name, &json) {
            Err(Error::InvalidDocument(msg)) => Err(Error::invalid(format!("{}: {}", location, msg))),
            other => other,
        }
    })
}

fn parse<'de, T: Deserialize<'de>>(json: &'de serde_json::Value, type_name: ValueTypeName) -> Result<T> {
    T::deserialize(json).map_err(|e| Error::invalid(format!("expected {} value: {}", type_name, e)))
}

fn vec2s(v: Vec<[f32; 2]>) -> Vec<Vec2> {
    v.into_iter().map(Vec2::from).collect()
}

fn vec3s(v: Vec<[f32; 3]>) -> Vec<Vec3> {
    v.into_iter().map(Vec3::from).collect()
}

/// Convert a JSON payload to a [`Value`] of the declared type.
pub fn value_from_json(type_name: ValueTypeName, json: &serde_json::Value) -> Result<Value> {
    use ValueTypeName as T;
    let value = match type_name {
        T::Bool => Value::Bool(parse(json, type_name)?),
        T::Int => Value::Int(parse(json, type_name)?),
        T::Float => Value::Float(parse(json, type_name)?),
        T::Double => Value::Double(parse(json, type_name)?),
        T::Token => Value::Token(parse(json, type_name)?),
        T::String => Value::String(parse(json, type_name)?),
        T::IntArray => Value::IntArray(parse(json, type_name)?),
        T::FloatArray => Value::FloatArray(parse(json, type_name)?),
        T::DoubleArray => Value::DoubleArray(parse(json, type_name)?),
        T::Float2Array => Value::Float2Array(vec2s(parse(json, type_name)?)),
        T::TexCoord2fArray => Value::TexCoord2fArray(vec2s(parse(json, type_name)?)),
        T::Float3Array => Value::Float3Array(vec3s(parse(json, type_name)?)),
        T::Point3fArray => Value::Point3fArray(vec3s(parse(json, type_name)?)),
        T::Normal3fArray => Value::Normal3fArray(vec3s(parse(json, type_name)?)),
        T::Vector3fArray => Value::Vector3fArray(vec3s(parse(json, type_name)?)),
        T::Color3fArray => Value::Color3fArray(vec3s(parse(json, type_name)?)),
        T::TokenArray => Value::TokenArray(parse(json, type_name)?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SceneReader, TimeCode};
    use serde_json::json;

    #[test]
    fn test_value_from_json() {
        let v = value_from_json(ValueTypeName::Point3fArray, &json!([[0, 0, 0], [1, 2, 3]])).unwrap();
        assert_eq!(v, Value::Point3fArray(vec![Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0)]));

        let v = value_from_json(ValueTypeName::Token, &json!("catmullClark")).unwrap();
        assert_eq!(v, Value::Token("catmullClark".into()));

        let err = value_from_json(ValueTypeName::IntArray, &json!([[1, 2]])).unwrap_err();
        assert!(matches!(err, Error::InvalidDocument(_)));
    }

    #[test]
    fn test_minimal_document() {
        let stage = MemoryStage::from_json_str(
            r#"{ "prims": [
                { "path": "/world", "type": "Xform",
                  "xform": { "default": [ { "type": "translate", "values": [0, 1, 0] } ] } },
                { "path": "/world/m", "type": "Mesh",
                  "attributes": {
                    "points": { "type": "point3f[]", "timeSamples": { "1": [[0,0,0]], "2.5": [[1,0,0]] } }
                  },
                  "primvars": {
                    "st": { "type": "texCoord2f[]", "interpolation": "vertex",
                            "default": [[0.5, 0.5]], "indices": { "default": [0] } }
                  } }
            ] }"#,
        )
        .unwrap();

        assert_eq!(stage.type_name("/world/m").unwrap(), "Mesh");
        assert_eq!(stage.num_time_samples("/world/m", "points"), 2);
        let info = stage.primvar("/world/m", "st").unwrap();
        assert_eq!(info.interpolation, Interpolation::Vertex);
        assert!(info.indexed);
        let t = stage.local_to_world("/world/m", 1.0).unwrap();
        assert_eq!(t.w_axis.y, 1.0);
        assert!(stage.read_attribute("/world/m", "points", TimeCode::At(2.5)).is_ok());
    }

    #[test]
    fn test_bad_documents() {
        let bad_key = r#"{ "prims": [ { "path": "/m", "type": "Mesh", "attributes": {
            "points": { "type": "point3f[]", "timeSamples": { "one": [] } } } } ] }"#;
        assert!(matches!(MemoryStage::from_json_str(bad_key), Err(Error::InvalidDocument(_))));

        for key in ["NaN", "inf", "-inf", "infinity"] {
            let doc = format!(
                r#"{{ "prims": [ {{ "path": "/m", "type": "Mesh", "attributes": {{
                "points": {{ "type": "point3f[]", "timeSamples": {{ "1": [[0, 0, 0]], "{}": [[1, 1, 1]] }} }} }} }} ] }}"#,
                key
            );
            match MemoryStage::from_json_str(&doc) {
                Err(Error::InvalidDocument(msg)) => assert!(msg.contains("/m.points"), "{}", msg),
                other => panic!("key {key} accepted: {other:?}"),
            }
        }

        let xform_key = r#"{ "prims": [ { "path": "/x", "type": "Xform",
            "xform": { "timeSamples": { "NaN": [] } } } ] }"#;
        assert!(matches!(MemoryStage::from_json_str(xform_key), Err(Error::InvalidDocument(_))));

        let relative = r#"{ "prims": [ { "path": "m", "type": "Mesh" } ] }"#;
        assert!(matches!(MemoryStage::from_json_str(relative), Err(Error::InvalidDocument(_))));

        let unknown_type = r#"{ "prims": [ { "path": "/m", "attributes": {
            "a": { "type": "matrix4d", "default": 1 } } } ] }"#;
        assert!(matches!(MemoryStage::from_json_str(unknown_type), Err(Error::Json(_))));
    }
}
