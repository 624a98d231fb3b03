//! Error types
//!
//! Translation misses are never errors (they surface as `None` or empty sets);
//! these enums only cover malformed inputs and I/O at the crate boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Inconsistent documented-member model
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Javadoc documentation of {member} must contain only one @return tag")]
    DuplicateReturnTag { member: String },

    #[error("Constructor {member} cannot declare a return type")]
    ConstructorReturnType { member: String },
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Edit distance threshold must be positive, got {0}")]
    InvalidThreshold(usize),
}

/// Errors reading or writing the JSON inputs of the translator
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid member in {path}: {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

impl LoadError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn json(path: &std::path::Path, source: serde_json::Error) -> Self {
        LoadError::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}
