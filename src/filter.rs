//! Path-substring filter gating which prims are extracted.

/// Environment variable holding required path substrings.
pub const REQUIRE_PATH_SUBSTR_ENV: &str = "PX_USDREADER_REQUIRE_GEOM_PATH_SUBSTR";
/// Environment variable holding ignored path substrings.
pub const IGNORE_PATH_SUBSTR_ENV: &str = "PX_USDREADER_IGNORE_GEOM_PATH_SUBSTR";

/// Require-any / ignore-any substring filter over prim paths.
///
/// The filter is an immutable value; reloading builds a new one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathFilter {
    require: Vec<String>,
    ignore: Vec<String>,
}

impl PathFilter {
    /// Create a filter from explicit lists.
    pub fn new(require: Vec<String>, ignore: Vec<String>) -> Self {
        Self { require, ignore }
    }

    /// Filter accepting every path.
    pub fn accept_all() -> Self {
        Self::default()
    }

    /// Required substrings, in scan order.
    pub fn require(&self) -> &[String] {
        &self.require
    }

    /// Ignored substrings.
    pub fn ignore(&self) -> &[String] {
        &self.ignore
    }

    /// Check a prim path.
    ///
    /// With a non-empty require list the path must contain one of its
    /// entries; a path containing any ignore entry is always rejected.
    pub fn accept(&self, path: &str) -> bool {
        if !self.require.is_empty() && !self.require.iter().any(|s| path.contains(s.as_str())) {
            return false;
        }
        !self.ignore.iter().any(|s| path.contains(s.as_str()))
    }

    /// Filter from the process environment, starting from an empty filter.
    pub fn from_env() -> Self {
        Self::default().reloaded(|name| std::env::var(name).ok())
    }

    /// Copy of this filter with lists replaced by the variables `lookup`
    /// returns. Absent or empty variables leave their list untouched.
    pub fn reloaded<F>(&self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut next = self.clone();
        if let Some(v) = lookup(REQUIRE_PATH_SUBSTR_ENV).filter(|v| !v.is_empty()) {
            next.require = split_patterns(&v);
        }
        if let Some(v) = lookup(IGNORE_PATH_SUBSTR_ENV).filter(|v| !v.is_empty()) {
            next.ignore = split_patterns(&v);
        }
        tracing::debug!(require = ?next.require, ignore = ?next.ignore, "path filter loaded");
        next
    }
}

/// Split a comma-separated pattern list, dropping empty tokens.
pub fn split_patterns(s: &str) -> Vec<String> {
    s.split(',').filter(|t| !t.is_empty()).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(require: &[&str], ignore: &[&str]) -> PathFilter {
        PathFilter::new(
            require.iter().map(|s| s.to_string()).collect(),
            ignore.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn test_accept_all() {
        let f = PathFilter::accept_all();
        assert!(f.accept("/anything/at/all"));
        assert!(f.accept(""));
    }

    #[test]
    fn test_require() {
        let f = filter(&["render", "hero"], &[]);
        assert!(f.accept("/world/hero/body"));
        assert!(f.accept("/world/render_geo/body"));
        assert!(!f.accept("/world/proxy/body"));
    }

    #[test]
    fn test_ignore_overrides_require() {
        let f = filter(&["hero"], &["proxy"]);
        assert!(f.accept("/hero/body"));
        assert!(!f.accept("/hero/proxy/body"));

        let f = filter(&[], &["proxy", "guide"]);
        assert!(f.accept("/hero/body"));
        assert!(!f.accept("/hero/guide"));
    }

    #[test]
    fn test_split() {
        assert_eq!(split_patterns("a,b"), vec!["a", "b"]);
        assert_eq!(split_patterns("a,,b,"), vec!["a", "b"]);
        assert!(split_patterns(",").is_empty());
    }

    #[test]
    fn test_reload_replaces_present_lists() {
        let base = filter(&["old_req"], &["old_ign"]);
        let f = base.reloaded(|name| match name {
            REQUIRE_PATH_SUBSTR_ENV => Some("geo,mesh".to_string()),
            _ => None,
        });
        assert_eq!(f.require(), ["geo", "mesh"]);
        assert_eq!(f.ignore(), ["old_ign"]);
        // The original value is untouched.
        assert_eq!(base.require(), ["old_req"]);
    }

    #[test]
    fn test_reload_empty_variable_keeps_list() {
        let base = filter(&[], &["proxy"]);
        let f = base.reloaded(|_| Some(String::new()));
        assert_eq!(f, base);
    }
}
