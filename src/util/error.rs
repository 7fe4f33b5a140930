//! Error types for scene reads and document loading.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scene-graph operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// No prim is defined at the given path
    #[error("Prim not found: {0}")]
    PrimNotFound(String),

    /// Prim exists but carries no attribute with this name
    #[error("Attribute not found: {prim}.{name}")]
    AttributeNotFound { prim: String, name: String },

    /// Attribute exists but resolves to nothing at the requested time
    #[error("No value for {prim}.{name} at time {time}")]
    NoValue { prim: String, name: String, time: String },

    /// Type mismatch when casting a value
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Transform op carries the wrong number of values
    #[error("Invalid {op} op: expected {expected} values, got {actual}")]
    InvalidXformOp { op: String, expected: usize, actual: usize },

    /// Transform cannot be inverted
    #[error("Singular transform on {0}")]
    SingularTransform(String),

    /// Malformed stage document
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid document error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidDocument(msg.into())
    }

    /// Create an attribute-not-found error.
    pub fn missing_attribute(prim: &str, name: &str) -> Self {
        Self::AttributeNotFound {
            prim: prim.to_string(),
            name: name.to_string(),
        }
    }
}

/// Result type alias for scene-graph operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::missing_attribute("/root/mesh", "points");
        assert_eq!(e.to_string(), "Attribute not found: /root/mesh.points");

        let e = Error::InvalidXformOp { op: "translate".into(), expected: 3, actual: 2 };
        assert!(e.to_string().contains("3"));
        assert!(e.to_string().contains("2"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
