use mis_model::{CheckKind, Finding, MappedDataset};

pub fn check(dataset: &MappedDataset) -> Vec<Finding> {
    if dataset.is_empty() {
        vec![Finding::warning(
            CheckKind::EmptyDataset,
            None,
            0,
            "dataset has no data rows",
        )]
    } else {
        Vec::new()
    }
}
