//! Duplicate rows across all mapped fields.

use std::collections::BTreeSet;

use mis_model::{CellValue, CheckKind, Finding, MappedDataset};

use crate::options::ValidationOptions;

pub fn check(dataset: &MappedDataset, options: &ValidationOptions) -> Vec<Finding> {
    if dataset.fields.is_empty() {
        return Vec::new();
    }
    let duplicates = count_duplicates(dataset);
    if duplicates > options.duplicate_threshold {
        vec![Finding::warning(
            CheckKind::DuplicateRows,
            None,
            duplicates,
            format!("{duplicates} rows repeat an earlier row across all mapped fields"),
        )]
    } else {
        Vec::new()
    }
}

/// Rows equal to some earlier row; the first occurrence is not counted.
pub fn count_duplicates(dataset: &MappedDataset) -> usize {
    let mut seen: BTreeSet<Vec<String>> = BTreeSet::new();
    dataset
        .rows
        .iter()
        .filter(|row| !seen.insert(row.cells.iter().map(cell_key).collect()))
        .count()
}

// Tagged so a number and the same digits as text stay distinct.
fn cell_key(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(text) => format!("t:{text}"),
        CellValue::Number(value) => format!("n:{value}"),
        CellValue::Date(date) => format!("d:{date}"),
        CellValue::Missing => "m".to_string(),
    }
}
