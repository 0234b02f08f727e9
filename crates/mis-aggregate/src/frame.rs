//! DataFrame views of selected rows and chart tables.

use std::fs::File;
use std::path::Path;

use polars::prelude::{Column, CsvWriter, DataFrame, SerWriter};
use tracing::info;

use mis_model::{CellValue, ChartTable, MappedDataset, MappedRow};

use crate::error::{AggregateError, Result};

/// One column per mapped field, in canonical order.
///
/// Numeric fields become `f64` columns; dates and categories are written as
/// text (`YYYY-MM-DD` for dates).
pub fn rows_to_frame(dataset: &MappedDataset, rows: &[&MappedRow]) -> Result<DataFrame> {
    let columns = dataset
        .fields
        .iter()
        .map(|field| {
            let name = field.as_str();
            if field.is_numeric() {
                let values: Vec<Option<f64>> = rows
                    .iter()
                    .map(|row| dataset.get(row, *field).and_then(CellValue::as_number))
                    .collect();
                Column::new(name.into(), values)
            } else {
                let values: Vec<Option<String>> = rows
                    .iter()
                    .map(|row| {
                        dataset
                            .get(row, *field)
                            .filter(|cell| !cell.is_missing())
                            .map(CellValue::render)
                    })
                    .collect();
                Column::new(name.into(), values)
            }
        })
        .collect::<Vec<_>>();
    Ok(DataFrame::new(columns)?)
}

/// Key column named after the grouping field, then one column per series.
pub fn chart_to_frame(table: &ChartTable) -> Result<DataFrame> {
    let keys: Vec<&str> = table.keys();
    let mut columns = vec![Column::new(table.group_by.as_str().into(), keys)];
    for (idx, series) in table.series.iter().enumerate() {
        let values: Vec<f64> = table
            .rows
            .iter()
            .map(|row| row.values.get(idx).copied().unwrap_or(0.0))
            .collect();
        columns.push(Column::new(series.as_str().into(), values));
    }
    Ok(DataFrame::new(columns)?)
}

/// Writes `frame` as CSV with a header row.
pub fn write_csv(frame: &mut DataFrame, path: &Path) -> Result<()> {
    let io_error = |source| AggregateError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::create(path).map_err(io_error)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(frame)?;
    info!(path = %path.display(), rows = frame.height(), "wrote csv");
    Ok(())
}
