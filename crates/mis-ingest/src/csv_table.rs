use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::debug;

use mis_model::{CellValue, RawDataset};

use crate::error::{IngestError, Result};
use crate::header::unique_headers;

/// Reads a CSV file. The first non-blank row is the header.
///
/// Every non-empty cell is loaded as text; typing happens during projection.
pub fn read_csv_dataset(path: &Path) -> Result<RawDataset> {
    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|err| csv_error(path, &err))?;
    read_records(reader, path, &source_name(path))
}

/// Parses CSV text already in memory.
pub fn read_csv_str(source: &str, contents: &str) -> Result<RawDataset> {
    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(contents.as_bytes());
    read_records(reader, Path::new(source), source)
}

fn read_records<R: Read>(
    mut reader: csv::Reader<R>,
    path: &Path,
    source: &str,
) -> Result<RawDataset> {
    let mut header: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| csv_error(path, &err))?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        match header {
            None => header = Some(record.iter().map(str::to_string).collect()),
            Some(_) => rows.push(record.iter().map(CellValue::text).collect()),
        }
    }
    let Some(header) = header else {
        return Err(IngestError::EmptyFile {
            path: path.to_path_buf(),
        });
    };
    let headers = unique_headers(header);
    debug!(
        source,
        columns = headers.len(),
        rows = rows.len(),
        "parsed csv"
    );
    Ok(RawDataset::new(source, headers, rows))
}

fn csv_error(path: &Path, err: &csv::Error) -> IngestError {
    IngestError::CsvParse {
        path: PathBuf::from(path),
        message: err.to_string(),
    }
}

pub(crate) fn source_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_skipped_and_short_rows_padded() {
        let dataset = read_csv_str("inline.csv", "\nA,B,C\n1,x\n,,\n2,y,z\n").unwrap();
        assert_eq!(dataset.headers, vec!["A", "B", "C"]);
        assert_eq!(dataset.rows.len(), 2);
        assert_eq!(dataset.rows[0][2], CellValue::Missing);
        assert_eq!(dataset.rows[1][2], CellValue::Text("z".into()));
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = read_csv_str("empty.csv", "\n\n").unwrap_err();
        assert!(matches!(err, IngestError::EmptyFile { .. }));
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let dataset = read_csv_str("inline.csv", "Month,Revenue\n").unwrap();
        assert_eq!(dataset.row_count(), 0);
        assert_eq!(dataset.column_count(), 2);
    }
}
