use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

use mis_model::CanonicalField;

#[derive(Debug, Error)]
pub enum AggregateError {
    /// The validation report has blocking findings.
    #[error("insufficient data: {}", blocking.join("; "))]
    InsufficientData { blocking: Vec<String> },

    #[error("field '{field}' is not mapped")]
    FieldNotMapped { field: CanonicalField },

    #[error("cannot group by numeric field '{field}'")]
    NotGroupable { field: CanonicalField },

    #[error("field '{field}' is not numeric")]
    NotNumeric { field: CanonicalField },

    #[error("unknown series '{name}' (available: {})", available.join(", "))]
    UnknownSeries {
        name: String,
        available: Vec<String>,
    },

    #[error("invalid measure '{0}' (expected sum(FIELD), mean(FIELD) or count)")]
    InvalidMeasure(String),

    #[error("dataframe error: {0}")]
    Frame(#[from] PolarsError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AggregateError>;
