//! Error types for mapping operations.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read mapping document {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write mapping document {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid mapping document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported mapping document version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// A manual binding names a column the dataset does not have.
    #[error("column '{column}' not found in the dataset header")]
    ColumnNotFound { column: String },
}

pub type Result<T> = std::result::Result<T, MapError>;
