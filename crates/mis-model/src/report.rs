use serde::{Deserialize, Serialize};

use crate::CanonicalField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// Which check produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    RequiredFields,
    NumericCoercion,
    TemporalParse,
    NullRate,
    DuplicateRows,
    EmptyDataset,
    MappingConflict,
    MissingSource,
    UnknownField,
}

impl CheckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequiredFields => "required_fields",
            Self::NumericCoercion => "numeric_coercion",
            Self::TemporalParse => "temporal_parse",
            Self::NullRate => "null_rate",
            Self::DuplicateRows => "duplicate_rows",
            Self::EmptyDataset => "empty_dataset",
            Self::MappingConflict => "mapping_conflict",
            Self::MissingSource => "missing_source",
            Self::UnknownField => "unknown_field",
        }
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub check: CheckKind,
    /// Field the finding refers to, if any.
    pub field: Option<CanonicalField>,
    /// Number of affected rows (or columns for mapping findings).
    pub count: usize,
    /// Human-readable description.
    pub message: String,
}

impl Finding {
    pub fn error(
        check: CheckKind,
        field: Option<CanonicalField>,
        count: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            check,
            field,
            count,
            message: message.into(),
        }
    }

    pub fn warning(
        check: CheckKind,
        field: Option<CanonicalField>,
        count: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            check,
            field,
            count,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Outcome of validating a mapped dataset. Any error blocks aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub row_count: usize,
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn new(row_count: usize) -> Self {
        Self {
            row_count,
            findings: Vec::new(),
        }
    }

    pub fn add(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn for_check(&self, check: CheckKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.check == check)
    }
}
