use std::path::Path;

use calamine::{Data, DataType, Reader, open_workbook_auto};
use tracing::debug;

use mis_model::{CellValue, RawDataset};

use crate::csv_table::source_name;
use crate::error::{IngestError, Result};
use crate::header::unique_headers;

/// Reads one worksheet of a spreadsheet. Defaults to the first sheet.
///
/// Cells keep the type the workbook stores: numbers stay numbers and
/// date-formatted cells become dates.
pub fn read_workbook_dataset(path: &Path, sheet: Option<&str>) -> Result<RawDataset> {
    let mut workbook = open_workbook_auto(path).map_err(|err| IngestError::Workbook {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let names = workbook.sheet_names();
    let sheet_name = match sheet {
        Some(wanted) => names
            .iter()
            .find(|name| name.as_str() == wanted)
            .or_else(|| names.iter().find(|name| name.eq_ignore_ascii_case(wanted)))
            .cloned()
            .ok_or_else(|| IngestError::SheetNotFound {
                path: path.to_path_buf(),
                sheet: wanted.to_string(),
            })?,
        None => names.first().cloned().ok_or_else(|| IngestError::EmptyFile {
            path: path.to_path_buf(),
        })?,
    };
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|err| IngestError::Workbook {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_from_data).collect::<Vec<_>>())
        .filter(|row| !row.iter().all(CellValue::is_missing));
    let Some(header) = rows.next() else {
        return Err(IngestError::EmptyFile {
            path: path.to_path_buf(),
        });
    };
    let headers = unique_headers(header.iter().map(CellValue::render).collect());
    let rows: Vec<Vec<CellValue>> = rows.collect();
    debug!(
        sheet = %sheet_name,
        columns = headers.len(),
        rows = rows.len(),
        "parsed worksheet"
    );
    Ok(RawDataset::new(
        format!("{}#{sheet_name}", source_name(path)),
        headers,
        rows,
    ))
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Missing,
        Data::String(text) => CellValue::text(text),
        Data::Float(value) => CellValue::Number(*value),
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Bool(value) => CellValue::Text(value.to_string()),
        Data::DateTime(_) | Data::DateTimeIso(_) => match data.as_date() {
            Some(date) => CellValue::Date(date),
            None => CellValue::text(&data.to_string()),
        },
        // Error cells (#DIV/0!, #N/A) stay visible as text.
        other => CellValue::text(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_cells_keep_their_kind() {
        assert_eq!(cell_from_data(&Data::Empty), CellValue::Missing);
        assert_eq!(cell_from_data(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(cell_from_data(&Data::Float(2.5)), CellValue::Number(2.5));
        assert_eq!(
            cell_from_data(&Data::String("  Web ".into())),
            CellValue::Text("Web".into())
        );
        assert_eq!(
            cell_from_data(&Data::Bool(true)),
            CellValue::Text("true".into())
        );
    }

    #[test]
    fn iso_datetime_cells_become_dates() {
        let cell = cell_from_data(&Data::DateTimeIso("2024-01-15T00:00:00".into()));
        assert_eq!(
            cell,
            CellValue::Date(chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
    }

    #[test]
    fn missing_file_is_a_workbook_error() {
        let err = read_workbook_dataset(Path::new("/nonexistent/book.xlsx"), None).unwrap_err();
        assert!(matches!(err, IngestError::Workbook { .. }));
    }
}
