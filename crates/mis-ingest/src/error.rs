//! Error types for MIS data ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that make a file unloadable. Fatal to the current load.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Extension is neither CSV nor a known spreadsheet format.
    #[error("unsupported file format '{extension}' for {path} (expected csv, xlsx, xlsm, xls, xlsb or ods)")]
    UnsupportedFormat { path: PathBuf, extension: String },

    // === Parsing Errors ===
    /// Failed to tokenize CSV.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed to open or read a workbook.
    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    /// Requested worksheet does not exist.
    #[error("sheet '{sheet}' not found in {path}")]
    SheetNotFound { path: PathBuf, sheet: String },

    /// File has no header row.
    #[error("file is empty: {path}")]
    EmptyFile { path: PathBuf },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/file.csv"),
        };
        assert_eq!(err.to_string(), "file not found: /path/to/file.csv");
    }

    #[test]
    fn test_unsupported_format_names_extension() {
        let err = IngestError::UnsupportedFormat {
            path: PathBuf::from("deck.pptx"),
            extension: "pptx".to_string(),
        };
        assert!(err.to_string().starts_with("unsupported file format 'pptx'"));
    }
}
