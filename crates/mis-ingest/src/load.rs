//! Format detection and the single entry point used by front ends.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use mis_model::RawDataset;

use crate::csv_table::read_csv_dataset;
use crate::error::{IngestError, Result};
use crate::workbook::read_workbook_dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Spreadsheet,
}

impl FileFormat {
    /// Detects the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Self::Spreadsheet),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Worksheet to read from a spreadsheet; ignored for CSV.
    pub sheet: Option<String>,
}

/// Loads a CSV or spreadsheet file into a [`RawDataset`].
pub fn load_dataset(path: &Path, options: &LoadOptions) -> Result<RawDataset> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let format = FileFormat::from_path(path)?;
    let dataset = match format {
        FileFormat::Csv => read_csv_dataset(path)?,
        FileFormat::Spreadsheet => read_workbook_dataset(path, options.sheet.as_deref())?,
    };
    info!(
        path = %path.display(),
        format = ?format,
        rows = dataset.row_count(),
        columns = dataset.column_count(),
        dataset_id = %dataset.id,
        "loaded dataset"
    );
    Ok(dataset)
}
