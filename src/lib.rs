//! # geodata
//!
//! Flattened, frame-indexed mesh extraction from time-sampled scene graphs.
//!
//! A scene is anything implementing [`core::SceneReader`]. Mesh prims are
//! read into a [`geom::MeshSnapshot`]: topology, per-frame baked vertices,
//! one resolved UV set, normals and subdivision tags, with no reference
//! back to the scene.
//!
//! ## Modules
//!
//! - [`util`] - Errors and math helpers
//! - [`core`] - Scene read interface, values, time sampling
//! - [`geom`] - Mesh schema, extraction, UV discovery, transforms
//! - [`stage`] - In-memory stage and its JSON document
//! - [`filter`] - Path-substring filter
//! - [`config`] - Reader configuration from the environment
//!
//! ## Example
//!
//! ```ignore
//! use geodata::prelude::*;
//!
//! let stage = MemoryStage::load("scene.json")?;
//! let config = ReaderConfig::from_env();
//! let request = ExtractRequest::new([1]).with_uv_set("st");
//!
//! let mut log = Vec::new();
//! for path in eligible_meshes(&stage, "/", &config.path_filter) {
//!     let extraction = MeshExtractor::new(&stage, &config).extract(&path, &request, &mut log);
//!     println!("{}: {} faces", path, extraction.snapshot().num_faces());
//! }
//! ```

pub mod util;
pub mod core;
pub mod geom;
pub mod stage;
pub mod filter;
pub mod config;

// Re-export commonly used types
pub use util::{Error, Result};

/// Version line: package version plus the build stamp.
pub fn version_string() -> String {
    format!(
        "geodata {} (built {} {})",
        env!("CARGO_PKG_VERSION"),
        env!("GEODATA_BUILD_DATE"),
        env!("GEODATA_BUILD_TIME")
    )
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::ReaderConfig;
    pub use crate::core::{Interpolation, SceneReader, TimeCode, Value, ValueTypeName};
    pub use crate::filter::PathFilter;
    pub use crate::geom::*;
    pub use crate::stage::MemoryStage;
    pub use crate::util::{Error, Result};
}
