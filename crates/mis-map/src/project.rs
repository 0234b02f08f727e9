//! Projection of a raw dataset through a mapping.

use tracing::{debug, warn};

use mis_ingest::{CoercionOptions, coerce_cell};
use mis_model::{CanonicalField, CellValue, DatasetId, MappedDataset, MappedRow, RawDataset};

use crate::mapping::ColumnMapping;

/// Builds the [`MappedDataset`] for `raw` under `mapping`.
///
/// Only mapped fields appear, in canonical order. Each cell is coerced to its
/// field's kind; failures stay as text so later stages can count them.
pub fn project(
    raw: &RawDataset,
    mapping: &ColumnMapping,
    coercion: &CoercionOptions,
) -> MappedDataset {
    let mut fields: Vec<CanonicalField> = Vec::new();
    let mut positions: Vec<usize> = Vec::new();
    for field in mapping.mapped_fields() {
        let Some(source) = mapping.source_for(field) else {
            continue;
        };
        match raw.column_index(source) {
            Some(idx) => {
                fields.push(field);
                positions.push(idx);
            }
            None => warn!(field = %field, column = %source, "mapped column absent; field skipped"),
        }
    }

    let rows = raw
        .rows
        .iter()
        .enumerate()
        .map(|(source_row, cells)| MappedRow {
            source_row,
            cells: fields
                .iter()
                .zip(&positions)
                .map(|(field, idx)| {
                    cells
                        .get(*idx)
                        .map_or(CellValue::Missing, |cell| coerce_cell(cell, *field, coercion))
                })
                .collect(),
        })
        .collect();

    MappedDataset {
        dataset_id: raw.id,
        fields,
        rows,
    }
}

type CacheKey = (DatasetId, Vec<(CanonicalField, String)>, CoercionOptions);

/// Single-slot memo for [`project`].
///
/// Holds the last projection and reuses it while the dataset, the bindings
/// and the coercion options are unchanged.
#[derive(Debug, Default)]
pub struct ProjectionCache {
    slot: Option<(CacheKey, MappedDataset)>,
    hits: u64,
    misses: u64,
}

impl ProjectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_project(
        &mut self,
        raw: &RawDataset,
        mapping: &ColumnMapping,
        coercion: &CoercionOptions,
    ) -> &MappedDataset {
        let key: CacheKey = (raw.id, mapping.key(), coercion.clone());
        if self.slot.as_ref().is_some_and(|(cached, _)| *cached == key) {
            self.hits += 1;
            debug!(dataset_id = %raw.id, "projection cache hit");
        } else {
            self.misses += 1;
            debug!(dataset_id = %raw.id, "projection cache miss");
            self.slot = None;
        }
        let (_, dataset) = self
            .slot
            .get_or_insert_with(|| (key, project(raw, mapping, coercion)));
        dataset
    }

    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
