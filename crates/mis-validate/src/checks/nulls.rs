use mis_model::{CheckKind, Finding, MappedDataset};

use super::{percent, rate};
use crate::options::ValidationOptions;

/// Warn on mapped fields that are mostly empty.
pub fn check(dataset: &MappedDataset, options: &ValidationOptions) -> Vec<Finding> {
    if dataset.is_empty() {
        return Vec::new();
    }
    dataset
        .fields
        .iter()
        .copied()
        .filter_map(|field| {
            let missing = dataset.missing_count(field);
            let null_rate = rate(missing, dataset.len());
            (null_rate > options.null_rate_threshold).then(|| {
                Finding::warning(
                    CheckKind::NullRate,
                    Some(field),
                    missing,
                    format!("{field}: {} of values are missing", percent(null_rate)),
                )
            })
        })
        .collect()
}
