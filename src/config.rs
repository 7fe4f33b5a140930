//! Reader configuration assembled from the environment.

use crate::filter::PathFilter;

/// Environment toggle allowing `float2[]` primvars as UV sources.
pub const READ_FLOAT2_AS_UV_ENV: &str = "MARI_READ_FLOAT2_AS_UV";

/// Process-level reader settings, owned by the host and passed by reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Which prims are eligible for extraction.
    pub path_filter: PathFilter,
    /// Accept `float2[]` primvars as UV sets alongside `texCoord2f[]`.
    pub read_float2_as_uv: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            path_filter: PathFilter::default(),
            read_float2_as_uv: true,
        }
    }
}

impl ReaderConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read_float2_as_uv = match lookup(READ_FLOAT2_AS_UV_ENV) {
            None => defaults.read_float2_as_uv,
            Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    "{}={:?} is not a boolean, using {}",
                    READ_FLOAT2_AS_UV_ENV,
                    raw,
                    defaults.read_float2_as_uv
                );
                defaults.read_float2_as_uv
            }),
        };
        Self {
            path_filter: defaults.path_filter.reloaded(&lookup),
            read_float2_as_uv,
        }
    }

    /// Replace the path filter.
    pub fn with_path_filter(mut self, path_filter: PathFilter) -> Self {
        self.path_filter = path_filter;
        self
    }

    /// Set the float2-as-UV toggle.
    pub fn with_read_float2_as_uv(mut self, enabled: bool) -> Self {
        self.read_float2_as_uv = enabled;
        self
    }
}

/// Parse an environment boolean (case-insensitive).
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
