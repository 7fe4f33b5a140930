//! Mesh geometry extraction.
//!
//! - [`IMesh`] - Typed mesh schema reads
//! - [`MeshExtractor`] - Flattening a mesh prim into a [`MeshSnapshot`]
//! - [`discover_uv_sets`] - UV-set candidates on a prim
//! - [`XformSample`] - Transform op stacks
//! - [`eligible_meshes`] / [`extract_all`] - Scene scan and batch runs

pub mod extract;
pub mod mesh;
pub mod scan;
pub mod snapshot;
pub mod subdiv;
pub mod uv;
pub mod xform;

pub use extract::{extract_mesh, ExtractError, ExtractRequest, Extraction, MeshExtractor};
pub use mesh::{attr, is_gprim_type, IMesh, GPRIM_TYPES, MESH_TYPE, SUBDIVISION_SCHEME_FALLBACK};
pub use scan::{eligible_meshes, extract_all, is_valid_node, BatchResult};
pub use snapshot::MeshSnapshot;
pub use subdiv::{BoundaryInterpolation, FaceVaryingInterpolation, SubdivScheme};
pub use uv::{discover_uv_sets, is_uv_primvar, is_uv_type, uv_set_name, UvSetCatalog};
pub use xform::{XformOp, XformOpType, XformSample};
