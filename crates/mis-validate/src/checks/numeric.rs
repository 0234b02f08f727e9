//! Numeric coercion failures.
//!
//! The failure rate is taken over non-missing cells. A field where every
//! non-missing cell failed is an error; otherwise a rate above the threshold
//! is a warning.

use mis_model::{CheckKind, Finding, MappedDataset};

use super::{percent, rate};
use crate::options::ValidationOptions;

pub fn check(dataset: &MappedDataset, options: &ValidationOptions) -> Vec<Finding> {
    let mut findings = Vec::new();
    for field in dataset.fields.iter().copied().filter(|f| f.is_numeric()) {
        let failures = dataset.coercion_failures(field);
        if failures == 0 {
            continue;
        }
        let present = dataset.len() - dataset.missing_count(field);
        let failure_rate = rate(failures, present);
        if failures == present {
            findings.push(Finding::error(
                CheckKind::NumericCoercion,
                Some(field),
                failures,
                format!("{field}: none of {present} values is numeric"),
            ));
        } else if failure_rate > options.numeric_failure_threshold {
            findings.push(Finding::warning(
                CheckKind::NumericCoercion,
                Some(field),
                failures,
                format!(
                    "{field}: {failures} of {present} values are not numeric ({}); those rows are excluded",
                    percent(failure_rate)
                ),
            ));
        }
    }
    findings
}
