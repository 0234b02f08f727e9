//! Data quality checks for mapped MIS datasets.
//!
//! [`validate`] runs every check and returns a
//! [`ValidationReport`](mis_model::ValidationReport). Any error finding
//! blocks aggregation; warnings are informational.

mod checks;
mod options;

use tracing::info;

use mis_model::{Finding, MappedDataset, ValidationReport};

pub use options::ValidationOptions;

/// Validate a mapped dataset. Never mutates it.
pub fn validate(dataset: &MappedDataset, options: &ValidationOptions) -> ValidationReport {
    let report = checks::run_all(dataset, options);
    info!(
        rows = report.row_count,
        errors = report.error_count(),
        warnings = report.warning_count(),
        "validation complete"
    );
    report
}

/// Validate and append findings produced earlier (e.g. mapping warnings).
pub fn validate_with(
    dataset: &MappedDataset,
    options: &ValidationOptions,
    extra: impl IntoIterator<Item = Finding>,
) -> ValidationReport {
    let mut report = validate(dataset, options);
    report.extend(extra);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mis_model::{CanonicalField, CellValue, CheckKind, DatasetId, MappedRow, Severity};

    fn dataset(fields: Vec<CanonicalField>, rows: Vec<Vec<CellValue>>) -> MappedDataset {
        MappedDataset {
            dataset_id: DatasetId::from_first_16_bytes_of_sha256([0u8; 32]),
            fields,
            rows: rows
                .into_iter()
                .enumerate()
                .map(|(source_row, cells)| MappedRow { source_row, cells })
                .collect(),
        }
    }

    fn num(value: f64) -> CellValue {
        CellValue::Number(value)
    }

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    fn day(d: u32) -> CellValue {
        CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
    }

    #[test]
    fn missing_field_groups_are_errors() {
        let report = validate(
            &dataset(vec![CanonicalField::Cost], vec![vec![num(1.0)]]),
            &ValidationOptions::default(),
        );
        let required: Vec<_> = report.for_check(CheckKind::RequiredFields).collect();
        assert_eq!(required.len(), 2);
        assert!(required.iter().all(|f| f.severity == Severity::Error));
    }

    #[test]
    fn numeric_failure_rate_uses_non_missing_cells() {
        // 1 failure among 10 present cells: 10% > 5%.
        let mut rows: Vec<Vec<CellValue>> = (1..=9).map(|d| vec![day(d), num(1.0)]).collect();
        rows.push(vec![day(10), text("n/a")]);
        rows.push(vec![day(11), CellValue::Missing]);
        let report = validate(
            &dataset(vec![CanonicalField::Date, CanonicalField::Revenue], rows),
            &ValidationOptions::default(),
        );
        let finding = report
            .for_check(CheckKind::NumericCoercion)
            .next()
            .expect("numeric finding");
        assert_eq!(finding.severity, Severity::Warning);
        assert_eq!(finding.count, 1);
        assert!(!report.has_errors());
    }

    #[test]
    fn all_numeric_failures_is_an_error() {
        let report = validate(
            &dataset(
                vec![CanonicalField::Date, CanonicalField::Orders],
                vec![vec![day(1), text("x")], vec![day(2), text("y")]],
            ),
            &ValidationOptions::default(),
        );
        assert!(report.has_errors());
        assert_eq!(
            report.errors().next().map(|f| f.check),
            Some(CheckKind::NumericCoercion)
        );
    }

    #[test]
    fn unparseable_dates_warn() {
        let report = validate(
            &dataset(
                vec![CanonicalField::Date, CanonicalField::Orders],
                vec![vec![day(1), num(1.0)], vec![text("soon"), num(2.0)]],
            ),
            &ValidationOptions::default(),
        );
        let finding = report
            .for_check(CheckKind::TemporalParse)
            .next()
            .expect("temporal finding");
        assert_eq!(finding.severity, Severity::Warning);
        assert_eq!(finding.field, Some(CanonicalField::Date));
    }

    #[test]
    fn fully_unparseable_dates_still_only_warn() {
        let report = validate(
            &dataset(
                vec![CanonicalField::Date, CanonicalField::Month, CanonicalField::Orders],
                vec![
                    vec![text("soon"), day(1), num(1.0)],
                    vec![text("later"), day(1), num(2.0)],
                ],
            ),
            &ValidationOptions::default(),
        );
        let findings: Vec<_> = report.for_check(CheckKind::TemporalParse).collect();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[0].count, 2);
        assert!(!report.has_errors());
    }

    #[test]
    fn mostly_empty_field_warns() {
        let report = validate(
            &dataset(
                vec![CanonicalField::Date, CanonicalField::Orders, CanonicalField::Cost],
                vec![
                    vec![day(1), num(1.0), CellValue::Missing],
                    vec![day(2), num(2.0), CellValue::Missing],
                    vec![day(3), num(3.0), num(1.0)],
                ],
            ),
            &ValidationOptions::default(),
        );
        let nulls: Vec<_> = report.for_check(CheckKind::NullRate).collect();
        assert_eq!(nulls.len(), 1);
        assert_eq!(nulls[0].field, Some(CanonicalField::Cost));
    }

    #[test]
    fn repeated_row_is_a_duplicate_warning() {
        let row = vec![day(1), text("web"), num(5.0)];
        let report = validate(
            &dataset(
                vec![
                    CanonicalField::Date,
                    CanonicalField::Channel,
                    CanonicalField::Orders,
                ],
                vec![row.clone(), row, vec![day(2), text("web"), num(5.0)]],
            ),
            &ValidationOptions::default(),
        );
        let finding = report
            .for_check(CheckKind::DuplicateRows)
            .next()
            .expect("duplicate finding");
        assert_eq!(finding.count, 1);
        assert_eq!(finding.severity, Severity::Warning);
    }

    #[test]
    fn duplicate_threshold_is_tunable() {
        let row = vec![day(1), num(5.0)];
        let options = ValidationOptions {
            duplicate_threshold: 1,
            ..ValidationOptions::default()
        };
        let report = validate(
            &dataset(
                vec![CanonicalField::Date, CanonicalField::Orders],
                vec![row.clone(), row],
            ),
            &options,
        );
        assert_eq!(report.for_check(CheckKind::DuplicateRows).count(), 0);
    }

    #[test]
    fn empty_dataset_only_warns() {
        let report = validate(
            &dataset(vec![CanonicalField::Month, CanonicalField::Revenue], Vec::new()),
            &ValidationOptions::default(),
        );
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].check, CheckKind::EmptyDataset);
        assert!(!report.has_errors());
    }
}
