//! Scene traversal and batch extraction.

use rayon::prelude::*;

use crate::config::ReaderConfig;
use crate::core::SceneReader;
use crate::filter::PathFilter;
use crate::geom::extract::{ExtractRequest, Extraction, MeshExtractor};
use crate::geom::mesh::MESH_TYPE;

/// A prim is extracted only if it is a mesh and its path passes the filter.
pub fn is_valid_node<S>(stage: &S, path: &str, filter: &PathFilter) -> bool
where
    S: SceneReader + ?Sized,
{
    matches!(stage.type_name(path), Ok(t) if t == MESH_TYPE) && filter.accept(path)
}

/// Depth-first list of valid nodes at and below `root`.
pub fn eligible_meshes<S>(stage: &S, root: &str, filter: &PathFilter) -> Vec<String>
where
    S: SceneReader + ?Sized,
{
    let mut found = Vec::new();
    let mut stack = vec![root.to_string()];
    while let Some(path) = stack.pop() {
        if is_valid_node(stage, &path, filter) {
            found.push(path.clone());
        }
        let mut children = stage.children(&path);
        // Reverse so the first child is visited first.
        children.reverse();
        stack.extend(children);
    }
    tracing::debug!(root, count = found.len(), "scanned for meshes");
    found
}

/// Result of one extraction in a batch.
#[derive(Clone, Debug)]
pub struct BatchResult {
    pub path: String,
    pub extraction: Extraction,
    /// Log lines produced by this extraction only.
    pub log: Vec<String>,
}

/// Extract every path in parallel. Output order matches `paths`.
pub fn extract_all<S>(
    stage: &S,
    paths: &[String],
    request: &ExtractRequest,
    config: &ReaderConfig,
) -> Vec<BatchResult>
where
    S: SceneReader + Sync + ?Sized,
{
    let _span = tracing::info_span!("extract_all", count = paths.len()).entered();
    let extractor = MeshExtractor::new(stage, config);
    paths
        .par_iter()
        .map(|path| {
            let mut log = Vec::new();
            let extraction = extractor.extract(path, request, &mut log);
            BatchResult {
                path: path.clone(),
                extraction,
                log,
            }
        })
        .collect()
}
