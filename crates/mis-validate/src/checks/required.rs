//! Required field groups.
//!
//! The dashboard needs a time axis and at least one volume or value measure.
//! Either group being entirely unmapped is an error.

use mis_model::{CanonicalField, CheckKind, Finding, MappedDataset};

const TEMPORAL_GROUP: [CanonicalField; 3] = [
    CanonicalField::Date,
    CanonicalField::Month,
    CanonicalField::Week,
];

const MEASURE_GROUP: [CanonicalField; 3] = [
    CanonicalField::Orders,
    CanonicalField::Revenue,
    CanonicalField::Gmv,
];

pub fn check(dataset: &MappedDataset) -> Vec<Finding> {
    [TEMPORAL_GROUP, MEASURE_GROUP]
        .into_iter()
        .filter(|group| !group.iter().any(|field| dataset.is_mapped(*field)))
        .map(|group| {
            let names: Vec<&str> = group.iter().map(CanonicalField::as_str).collect();
            Finding::error(
                CheckKind::RequiredFields,
                None,
                0,
                format!("map at least one of: {}", names.join(", ")),
            )
        })
        .collect()
}
