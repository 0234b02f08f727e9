//! Validation check modules.
//!
//! Each module performs one kind of check and returns its findings.

mod duplicates;
mod empty;
mod nulls;
mod numeric;
mod required;
mod temporal;

use mis_model::{MappedDataset, ValidationReport};

use crate::options::ValidationOptions;

/// Run all validation checks on a mapped dataset.
pub fn run_all(dataset: &MappedDataset, options: &ValidationOptions) -> ValidationReport {
    let mut report = ValidationReport::new(dataset.len());

    // 1. Empty dataset (warning only; aggregation yields zeros)
    report.extend(empty::check(dataset));

    // 2. Required field groups (temporal + volume/value)
    report.extend(required::check(dataset));

    // 3. Numeric coercion failures
    report.extend(numeric::check(dataset, options));

    // 4. Unparseable temporal values
    report.extend(temporal::check(dataset));

    // 5. Null rate per mapped field
    report.extend(nulls::check(dataset, options));

    // 6. Duplicate rows across mapped fields
    report.extend(duplicates::check(dataset, options));

    report
}

/// Share of `part` in `whole`, zero when `whole` is zero.
pub(crate) fn rate(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

pub(crate) fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}
