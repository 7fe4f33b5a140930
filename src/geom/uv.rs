//! UV-set rules shared by discovery and extraction.

use std::collections::BTreeMap;

use crate::config::ReaderConfig;
use crate::core::{PrimvarInfo, SceneReader, ValueTypeName};
use crate::geom::mesh::is_gprim_type;

/// Legacy prefixes of per-component UV primvars (`u_map1`, `v_map1`).
const COMPONENT_PREFIXES: [&str; 2] = ["v_", "u_"];

/// Check if a declared type can be read as a UV set.
pub fn is_uv_type(type_name: ValueTypeName, read_float2_as_uv: bool) -> bool {
    type_name == ValueTypeName::TexCoord2fArray
        || (read_float2_as_uv && type_name == ValueTypeName::Float2Array)
}

/// Check if a primvar can be resolved as the requested UV set.
pub fn is_uv_primvar(info: &PrimvarInfo, read_float2_as_uv: bool) -> bool {
    info.interpolation.is_vertex_or_face_varying() && is_uv_type(info.type_name, read_float2_as_uv)
}

/// UV-set name a primvar contributes to discovery, if any.
pub fn uv_set_name(info: &PrimvarInfo, read_float2_as_uv: bool) -> Option<&str> {
    if !info.interpolation.is_vertex_or_face_varying() {
        return None;
    }
    let prefixed = COMPONENT_PREFIXES.iter().any(|p| info.name.starts_with(p));
    if prefixed && info.type_name == ValueTypeName::FloatArray {
        Some(&info.name[2..])
    } else if is_uv_type(info.type_name, read_float2_as_uv) {
        Some(&info.name)
    } else {
        None
    }
}

/// UV-set names found on a prim, with the number of primvars claiming each.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UvSetCatalog {
    counts: BTreeMap<String, usize>,
}

impl UvSetCatalog {
    /// Record a sighting of `name`.
    pub fn insert(&mut self, name: &str) {
        *self.counts.entry(name.to_string()).or_insert(0) += 1;
    }

    /// Count for `name`, 0 if never seen.
    pub fn count(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.counts.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Names with their counts, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Names claimed by more than one primvar.
    pub fn ambiguous(&self) -> Vec<&str> {
        self.iter().filter(|(_, n)| *n > 1).map(|(k, _)| k).collect()
    }

    /// Consume into the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, usize> {
        self.counts
    }
}

/// Scan the primvars of a geometric prim for candidate UV sets.
pub fn discover_uv_sets<S>(stage: &S, path: &str, config: &ReaderConfig) -> UvSetCatalog
where
    S: SceneReader + ?Sized,
{
    let mut catalog = UvSetCatalog::default();
    match stage.type_name(path) {
        Ok(t) if is_gprim_type(t) => {}
        _ => return catalog,
    }
    for info in stage.primvars(path) {
        if let Some(name) = uv_set_name(&info, config.read_float2_as_uv) {
            catalog.insert(name);
        }
    }
    tracing::trace!(path, sets = catalog.len(), "uv sets discovered");
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Interpolation;

    fn info(name: &str, type_name: ValueTypeName, interpolation: Interpolation) -> PrimvarInfo {
        PrimvarInfo {
            name: name.to_string(),
            type_name,
            interpolation,
            element_size: 1,
            indexed: false,
        }
    }

    #[test]
    fn test_uv_types() {
        assert!(is_uv_type(ValueTypeName::TexCoord2fArray, false));
        assert!(is_uv_type(ValueTypeName::Float2Array, true));
        assert!(!is_uv_type(ValueTypeName::Float2Array, false));
        assert!(!is_uv_type(ValueTypeName::Float3Array, true));
    }

    #[test]
    fn test_uv_set_names() {
        use Interpolation::*;
        use ValueTypeName::*;

        assert_eq!(uv_set_name(&info("st", TexCoord2fArray, FaceVarying), true), Some("st"));
        assert_eq!(uv_set_name(&info("map1", Float2Array, Vertex), true), Some("map1"));
        assert_eq!(uv_set_name(&info("map1", Float2Array, Vertex), false), None);
        assert_eq!(uv_set_name(&info("u_map1", FloatArray, Vertex), false), Some("map1"));
        assert_eq!(uv_set_name(&info("v_map1", FloatArray, FaceVarying), false), Some("map1"));
        // Prefix only strips for plain float arrays.
        assert_eq!(uv_set_name(&info("v_st", TexCoord2fArray, Vertex), false), Some("v_st"));
        assert_eq!(uv_set_name(&info("w_map1", FloatArray, Vertex), false), None);
        // Wrong interpolation never qualifies.
        assert_eq!(uv_set_name(&info("st", TexCoord2fArray, Uniform), true), None);
        assert_eq!(uv_set_name(&info("u_map1", FloatArray, Constant), true), None);
    }

    #[test]
    fn test_catalog_counts() {
        let mut c = UvSetCatalog::default();
        c.insert("map1");
        c.insert("st");
        c.insert("map1");
        assert_eq!(c.count("map1"), 2);
        assert_eq!(c.count("st"), 1);
        assert_eq!(c.count("none"), 0);
        assert_eq!(c.ambiguous(), vec!["map1"]);
        assert_eq!(c.len(), 2);
    }
}
