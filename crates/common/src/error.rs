//! Error types for bugswap

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using bugswap Error
pub type Result<T> = std::result::Result<T, Error>;

/// bugswap error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown bug '{name}' (available: {})", .available.join(", "))]
    UnknownBug { name: String, available: Vec<String> },

    #[error("Failed to {op} {}: {source}", .path.display())]
    Filesystem {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog file not found: {}", .0.display())]
    CatalogNotFound(PathBuf),

    #[error("Failed to parse catalog {}: {source}", .path.display())]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Duplicate bug name in catalog: {0}")]
    DuplicateBug(String),

    #[error("Target {} is claimed by both '{first}' and '{second}'", .target.display())]
    SharedTarget {
        target: PathBuf,
        first: String,
        second: String,
    },
}

impl Error {
    /// Wrap an IO error with the operation and path it concerned
    pub fn fs(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Filesystem {
            op,
            path: path.into(),
            source,
        }
    }

    /// Whether the caller should be pointed at `list` to correct the input
    pub fn is_unknown_bug(&self) -> bool {
        matches!(self, Error::UnknownBug { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_bug_message_lists_names() {
        let err = Error::UnknownBug {
            name: "nope".to_string(),
            available: vec!["ui-misalignment".to_string(), "missing-cta".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unknown bug 'nope' (available: ui-misalignment, missing-cta)"
        );
        assert!(err.is_unknown_bug());
    }

    #[test]
    fn test_filesystem_message_names_path() {
        let err = Error::fs(
            "read",
            "src/index.css",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.to_string(), "Failed to read src/index.css: gone");
        assert!(!err.is_unknown_bug());
    }
}
