//! Row exclusion and filtering.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::debug;

use mis_ingest::bucket_start;
use mis_model::{CanonicalField, CellValue, ExclusionSummary, FilterSet, MappedDataset, MappedRow};

use crate::error::{AggregateError, Result};

/// Rows that survive exclusion and filtering, with the counts of the rest.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub rows: Vec<&'a MappedRow>,
    pub summary: ExclusionSummary,
}

impl Selection<'_> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Date used for range filters: `date`, else the month or week bucket start.
pub fn row_date(dataset: &MappedDataset, row: &MappedRow) -> Option<NaiveDate> {
    CanonicalField::TEMPORAL.into_iter().find_map(|field| {
        dataset
            .get(row, field)
            .and_then(CellValue::as_date)
            .map(|date| bucket_start(field, date))
    })
}

/// Mapped numeric and temporal fields whose cell in `row` failed coercion.
fn failed_fields<'d>(
    dataset: &'d MappedDataset,
    row: &'d MappedRow,
) -> impl Iterator<Item = CanonicalField> + 'd {
    dataset
        .fields
        .iter()
        .copied()
        .filter(|field| !field.is_categorical())
        .filter(move |field| {
            dataset
                .get(row, *field)
                .is_some_and(|cell| !cell.conforms_to(field.kind()))
        })
}

fn matches_value(allowed: &BTreeSet<String>, cell: Option<&CellValue>) -> bool {
    let Some(cell) = cell.filter(|cell| !cell.is_missing()) else {
        return false;
    };
    let value = cell.render();
    let value = value.trim();
    allowed
        .iter()
        .any(|candidate| candidate.trim().eq_ignore_ascii_case(value))
}

fn passes_filters(
    dataset: &MappedDataset,
    row: &MappedRow,
    filters: &FilterSet,
    constrained: &[CanonicalField],
) -> bool {
    if filters.has_date_range() {
        match row_date(dataset, row) {
            Some(date) if filters.date_in_range(date) => {}
            _ => return false,
        }
    }
    constrained.iter().all(|field| {
        filters
            .values_for(*field)
            .is_none_or(|allowed| matches_value(allowed, dataset.get(row, *field)))
    })
}

/// Drops rows with coercion failures, then applies `filters`.
///
/// Fails with [`AggregateError::FieldNotMapped`] when a value constraint
/// names a field the dataset does not carry.
pub fn select<'a>(dataset: &'a MappedDataset, filters: &FilterSet) -> Result<Selection<'a>> {
    let constrained = filters.constrained_fields();
    if let Some(field) = constrained.iter().find(|field| !dataset.is_mapped(**field)) {
        return Err(AggregateError::FieldNotMapped { field: *field });
    }

    let mut summary = ExclusionSummary {
        total_rows: dataset.len(),
        ..ExclusionSummary::default()
    };
    let mut rows = Vec::with_capacity(dataset.len());

    for row in &dataset.rows {
        let mut excluded = false;
        for field in failed_fields(dataset, row) {
            *summary.unparseable_by_field.entry(field).or_default() += 1;
            excluded = true;
        }
        if excluded {
            summary.unparseable_rows += 1;
            continue;
        }
        if passes_filters(dataset, row, filters, &constrained) {
            rows.push(row);
        } else {
            summary.filtered_rows += 1;
        }
    }
    summary.included_rows = rows.len();

    debug!(
        total = summary.total_rows,
        unparseable = summary.unparseable_rows,
        filtered = summary.filtered_rows,
        included = summary.included_rows,
        "selected rows"
    );
    Ok(Selection { rows, summary })
}
