//! The scene-graph read interface.
//!
//! Extraction only ever talks to a scene through [`SceneReader`]. Nodes are
//! addressed by absolute path (`/world/geo/mesh`); every read is fallible.

use crate::core::{Interpolation, TimeCode, Value, ValueTypeName};
use crate::util::{Chrono, DMat4, Result};

/// Declaration of a primvar on a prim.
#[derive(Clone, Debug, PartialEq)]
pub struct PrimvarInfo {
    /// Primvar name without namespace (`st`, not `primvars:st`).
    pub name: String,
    /// Declared value type.
    pub type_name: ValueTypeName,
    /// Interpolation.
    pub interpolation: Interpolation,
    /// Number of values per element.
    pub element_size: i32,
    /// Whether an index array is authored.
    pub indexed: bool,
}

/// Reader interface for a hierarchical, time-sampled scene.
pub trait SceneReader {
    /// Schema type name of the prim at `path` (`Mesh`, `Xform`, ...).
    fn type_name(&self, path: &str) -> Result<&str>;

    /// Absolute paths of the direct children of `path`.
    fn children(&self, path: &str) -> Vec<String>;

    /// Number of time samples authored on an attribute; 0 if the attribute
    /// is missing or only has a default.
    fn num_time_samples(&self, path: &str, attr: &str) -> usize;

    /// Read an attribute value.
    fn read_attribute(&self, path: &str, attr: &str, time: TimeCode) -> Result<Value>;

    /// Declarations of every primvar on the prim.
    fn primvars(&self, path: &str) -> Vec<PrimvarInfo>;

    /// Declaration of a single primvar.
    fn primvar(&self, path: &str, name: &str) -> Option<PrimvarInfo> {
        self.primvars(path).into_iter().find(|p| p.name == name)
    }

    /// Read the values of a primvar.
    fn read_primvar(&self, path: &str, name: &str, time: TimeCode) -> Result<Value>;

    /// Read the index array of an indexed primvar.
    fn read_primvar_indices(&self, path: &str, name: &str, time: TimeCode) -> Result<Vec<i32>>;

    /// Cumulative local-to-world transform of the prim at `time`.
    fn local_to_world(&self, path: &str, time: Chrono) -> Result<DMat4>;

    /// Check if a prim exists at `path`.
    fn exists(&self, path: &str) -> bool {
        self.type_name(path).is_ok()
    }
}
