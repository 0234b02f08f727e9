//! Non-fatal mapping diagnostics.

use std::fmt;

use serde::{Deserialize, Serialize};

use mis_model::{CanonicalField, CheckKind, Finding};

use crate::mapping::MatchTier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MappingWarning {
    /// Several columns matched a field at the same tier; the first was kept.
    Conflict {
        field: CanonicalField,
        tier: MatchTier,
        chosen: String,
        passed_over: Vec<String>,
    },
    /// A mapping document names a column the current header lacks.
    MissingSource {
        field: CanonicalField,
        column: String,
    },
    /// A mapping document binds one column to two fields; the field
    /// restored first keeps it.
    SharedSource {
        column: String,
        kept: CanonicalField,
        dropped: CanonicalField,
    },
    /// A mapping document has a key that is not a canonical field.
    UnknownField { key: String },
}

impl MappingWarning {
    pub fn field(&self) -> Option<CanonicalField> {
        match self {
            Self::Conflict { field, .. } | Self::MissingSource { field, .. } => Some(*field),
            Self::SharedSource { dropped, .. } => Some(*dropped),
            Self::UnknownField { .. } => None,
        }
    }

    /// Report entry for this warning; mapping findings never block.
    pub fn to_finding(&self) -> Finding {
        let (check, count) = match self {
            Self::Conflict { passed_over, .. } => (CheckKind::MappingConflict, passed_over.len()),
            Self::SharedSource { .. } => (CheckKind::MappingConflict, 1),
            Self::MissingSource { .. } => (CheckKind::MissingSource, 1),
            Self::UnknownField { .. } => (CheckKind::UnknownField, 1),
        };
        Finding::warning(check, self.field(), count, self.to_string())
    }
}

impl fmt::Display for MappingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict {
                field,
                tier,
                chosen,
                passed_over,
            } => write!(
                f,
                "{field}: '{chosen}' chosen over {} ({tier} match)",
                passed_over
                    .iter()
                    .map(|c| format!("'{c}'"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::MissingSource { field, column } => {
                write!(f, "{field}: column '{column}' not found; left unmapped")
            }
            Self::SharedSource {
                column,
                kept,
                dropped,
            } => write!(
                f,
                "{dropped}: column '{column}' already bound to {kept}; left unmapped"
            ),
            Self::UnknownField { key } => write!(f, "unknown field '{key}' ignored"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mis_model::Severity;

    #[test]
    fn conflict_becomes_a_warning_finding() {
        let warning = MappingWarning::Conflict {
            field: CanonicalField::Revenue,
            tier: MatchTier::Contains,
            chosen: "Sales A".into(),
            passed_over: vec!["Sales B".into()],
        };
        let finding = warning.to_finding();
        assert_eq!(finding.severity, Severity::Warning);
        assert_eq!(finding.check, CheckKind::MappingConflict);
        assert_eq!(finding.field, Some(CanonicalField::Revenue));
        assert_eq!(finding.count, 1);
        assert_eq!(
            finding.message,
            "revenue: 'Sales A' chosen over 'Sales B' (contains match)"
        );
    }

    #[test]
    fn shared_source_is_a_conflict_on_the_dropped_field() {
        let warning = MappingWarning::SharedSource {
            column: "Sales".into(),
            kept: CanonicalField::Gmv,
            dropped: CanonicalField::Revenue,
        };
        let finding = warning.to_finding();
        assert_eq!(finding.severity, Severity::Warning);
        assert_eq!(finding.check, CheckKind::MappingConflict);
        assert_eq!(finding.field, Some(CanonicalField::Revenue));
        assert_eq!(
            finding.message,
            "revenue: column 'Sales' already bound to gmv; left unmapped"
        );
    }
}
