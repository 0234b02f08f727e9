#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{CanonicalField, CellValue, DatasetId};

/// Uploaded tabular data, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDataset {
    pub id: DatasetId,
    /// Human-readable origin (file name or `sample`).
    pub source: String,
    pub headers: Vec<String>,
    /// Rows padded or truncated to the header width.
    pub rows: Vec<Vec<CellValue>>,
}

impl RawDataset {
    pub fn new(source: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = headers.len();
        let rows: Vec<Vec<CellValue>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Missing);
                row
            })
            .collect();
        let id = fingerprint(&headers, &rows);
        Self {
            id,
            source: source.into(),
            headers,
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Finds a source column: exact name first, then trimmed ASCII case-insensitive.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        if let Some(idx) = self.headers.iter().position(|h| h == name) {
            return Some(idx);
        }
        let wanted = name.trim();
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }
}

fn fingerprint(headers: &[String], rows: &[Vec<CellValue>]) -> DatasetId {
    let mut hasher = Sha256::new();
    for header in headers {
        hasher.update(header.as_bytes());
        hasher.update([0x1f]);
    }
    hasher.update([0x1e]);
    for row in rows {
        for cell in row {
            let tag: u8 = match cell {
                CellValue::Text(_) => b't',
                CellValue::Number(_) => b'n',
                CellValue::Date(_) => b'd',
                CellValue::Missing => b'm',
            };
            hasher.update([tag]);
            hasher.update(cell.render().as_bytes());
            hasher.update([0x1f]);
        }
        hasher.update([0x1e]);
    }
    let digest: [u8; 32] = hasher.finalize().into();
    DatasetId::from_first_16_bytes_of_sha256(digest)
}

/// One projected row; `cells` align with [`MappedDataset::fields`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedRow {
    /// Zero-based data row index in the raw dataset.
    pub source_row: usize,
    pub cells: Vec<CellValue>,
}

/// A raw dataset projected onto the canonical fields that are mapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedDataset {
    pub dataset_id: DatasetId,
    /// Mapped fields in canonical order.
    pub fields: Vec<CanonicalField>,
    pub rows: Vec<MappedRow>,
}

impl MappedDataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_mapped(&self, field: CanonicalField) -> bool {
        self.fields.contains(&field)
    }

    pub fn position(&self, field: CanonicalField) -> Option<usize> {
        self.fields.iter().position(|f| *f == field)
    }

    pub fn get<'a>(&self, row: &'a MappedRow, field: CanonicalField) -> Option<&'a CellValue> {
        self.position(field).and_then(|idx| row.cells.get(idx))
    }

    /// All cells of one field; empty when the field is not mapped.
    pub fn column(&self, field: CanonicalField) -> Vec<&CellValue> {
        match self.position(field) {
            Some(idx) => self.rows.iter().filter_map(|row| row.cells.get(idx)).collect(),
            None => Vec::new(),
        }
    }

    /// Non-missing cells of `field` that did not coerce to its kind.
    pub fn coercion_failures(&self, field: CanonicalField) -> usize {
        let kind = field.kind();
        self.column(field)
            .into_iter()
            .filter(|cell| !cell.conforms_to(kind))
            .count()
    }

    pub fn missing_count(&self, field: CanonicalField) -> usize {
        self.column(field)
            .into_iter()
            .filter(|cell| cell.is_missing())
            .count()
    }
}
