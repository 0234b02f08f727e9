//! Unparseable dates, weeks and months.
//!
//! Failed cells are dropped from aggregation, so they only warn. A dataset
//! with no usable time axis at all is caught by the required field check.

use mis_model::{CheckKind, Finding, MappedDataset};

pub fn check(dataset: &MappedDataset) -> Vec<Finding> {
    dataset
        .fields
        .iter()
        .copied()
        .filter(|field| field.is_temporal())
        .filter_map(|field| {
            let failures = dataset.coercion_failures(field);
            (failures > 0).then(|| {
                let present = dataset.len() - dataset.missing_count(field);
                Finding::warning(
                    CheckKind::TemporalParse,
                    Some(field),
                    failures,
                    format!(
                        "{field}: {failures} of {present} values could not be parsed; those rows are excluded"
                    ),
                )
            })
        })
        .collect()
}
