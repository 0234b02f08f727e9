//! Mapping documents: the persisted form of a [`ColumnMapping`].
//!
//! ```json
//! {
//!   "version": 1,
//!   "fields": { "cost": "COGS", "date": "Txn Date", "week": null, ... }
//! }
//! ```
//!
//! Every canonical field is present; `null` marks an unmapped field. Keys are
//! written in alphabetical order so saved files diff cleanly.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use mis_model::CanonicalField;

use crate::engine::MappingOutcome;
use crate::error::{MapError, Result};
use crate::mapping::ColumnMapping;
use crate::utils::find_column;
use crate::warning::MappingWarning;

pub const MAPPING_DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingDocument {
    pub version: u32,
    pub fields: BTreeMap<String, Option<String>>,
}

impl MappingDocument {
    pub fn from_mapping(mapping: &ColumnMapping) -> Self {
        let fields = mapping
            .sources()
            .into_iter()
            .map(|(field, source)| (field.as_str().to_string(), source.map(str::to_string)))
            .collect();
        Self {
            version: MAPPING_DOCUMENT_VERSION,
            fields,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let document: Self = serde_json::from_str(text)?;
        if document.version != MAPPING_DOCUMENT_VERSION {
            return Err(MapError::UnsupportedVersion {
                found: document.version,
                expected: MAPPING_DOCUMENT_VERSION,
            });
        }
        Ok(document)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut json = self.to_json()?;
        json.push('\n');
        fs::write(path, json).map_err(|source| MapError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "saved mapping document");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| MapError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Rebuilds a mapping against `headers`.
    ///
    /// Found columns become manual bindings and explicit `null`s stay
    /// unmapped on purpose. Keys restore in name order, so when two fields
    /// name the same column the earlier one keeps it. Shared columns, missing
    /// columns and unknown keys are reported as warnings; the affected fields
    /// are left free for suggestion.
    pub fn restore(&self, headers: &[String]) -> MappingOutcome {
        let mut mapping = ColumnMapping::new();
        let mut warnings = Vec::new();
        for (key, source) in &self.fields {
            let Ok(field) = key.parse::<CanonicalField>() else {
                warn!(key = %key, "unknown field in mapping document");
                warnings.push(MappingWarning::UnknownField { key: key.clone() });
                continue;
            };
            match source {
                None => mapping.set_manual(field, None),
                Some(column) => match find_column(headers, column) {
                    Some(idx) => {
                        let column = &headers[idx];
                        if let Some(kept) = mapping.field_for_source(column) {
                            warn!(
                                field = %field,
                                column = %column,
                                kept = %kept,
                                "column already restored for another field"
                            );
                            warnings.push(MappingWarning::SharedSource {
                                column: column.clone(),
                                kept,
                                dropped: field,
                            });
                        } else {
                            mapping.set_manual(field, Some(column.clone()));
                        }
                    }
                    None => {
                        warn!(field = %field, column = %column, "mapped column missing from header");
                        warnings.push(MappingWarning::MissingSource {
                            field,
                            column: column.clone(),
                        });
                    }
                },
            }
        }
        MappingOutcome { mapping, warnings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn document_lists_every_field() {
        let mut mapping = ColumnMapping::new();
        mapping.set_manual(CanonicalField::Revenue, Some("Net Sales".into()));
        let document = MappingDocument::from_mapping(&mapping);
        assert_eq!(document.fields.len(), CanonicalField::ALL.len());
        assert_eq!(document.fields["revenue"].as_deref(), Some("Net Sales"));
        assert_eq!(document.fields["cost"], None);
    }

    #[test]
    fn restore_reports_missing_columns_and_unknown_keys() {
        let text = r#"{
            "version": 1,
            "fields": { "revenue": "Net Sales", "cost": "COGS", "profit": "P", "date": null }
        }"#;
        let document = MappingDocument::from_json(text).unwrap();
        let outcome = document.restore(&headers(&["net sales"]));
        assert_eq!(
            outcome.mapping.source_for(CanonicalField::Revenue),
            Some("net sales")
        );
        assert!(outcome.mapping.is_manual(CanonicalField::Revenue));
        assert!(outcome.mapping.is_manual(CanonicalField::Date));
        assert!(outcome.mapping.binding(CanonicalField::Cost).is_none());
        assert_eq!(
            outcome.warnings,
            vec![
                MappingWarning::MissingSource {
                    field: CanonicalField::Cost,
                    column: "COGS".into(),
                },
                MappingWarning::UnknownField {
                    key: "profit".into()
                },
            ]
        );
    }

    #[test]
    fn restore_keeps_a_shared_column_for_one_field() {
        let text = r#"{
            "version": 1,
            "fields": { "revenue": "Sales", "gmv": "sales" }
        }"#;
        let document = MappingDocument::from_json(text).unwrap();
        let outcome = document.restore(&headers(&["Sales"]));
        assert_eq!(outcome.mapping.source_for(CanonicalField::Gmv), Some("Sales"));
        assert!(outcome.mapping.binding(CanonicalField::Revenue).is_none());
        assert_eq!(
            outcome.warnings,
            vec![MappingWarning::SharedSource {
                column: "Sales".into(),
                kept: CanonicalField::Gmv,
                dropped: CanonicalField::Revenue,
            }]
        );
    }

    #[test]
    fn other_versions_are_rejected() {
        let err = MappingDocument::from_json(r#"{"version": 2, "fields": {}}"#).unwrap_err();
        assert!(matches!(
            err,
            MapError::UnsupportedVersion {
                found: 2,
                expected: 1
            }
        ));
    }
}
