#![deny(unsafe_code)]

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::FieldKind;

/// A loosely typed cell, resolved once at load or during coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Missing,
}

impl CellValue {
    /// Builds a text cell, treating blank input as missing.
    pub fn text(raw: &str) -> Self {
        let trimmed = raw.trim().trim_matches('\u{feff}');
        if trimmed.is_empty() {
            Self::Missing
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// True when the cell is missing or already holds the kind's native variant.
    ///
    /// After projection a non-missing cell that does not conform is a
    /// coercion failure.
    pub fn conforms_to(&self, kind: FieldKind) -> bool {
        match (self, kind) {
            (Self::Missing, _) => true,
            (Self::Number(_), FieldKind::Numeric) => true,
            (Self::Date(_), FieldKind::Temporal) => true,
            (Self::Text(_), FieldKind::Categorical) => true,
            _ => false,
        }
    }

    /// Plain-text rendering used for display, keys and exports.
    pub fn render(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Number(value) => format_numeric(*value),
            Self::Date(value) => value.format("%Y-%m-%d").to_string(),
            Self::Missing => String::new(),
        }
    }
}

/// Formats a floating-point number without trailing fractional zeros.
pub fn format_numeric(value: f64) -> String {
    let s = format!("{value}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_missing() {
        assert_eq!(CellValue::text("   "), CellValue::Missing);
        assert_eq!(CellValue::text("\u{feff} web "), CellValue::Text("web".into()));
    }

    #[test]
    fn renders_numbers_without_losing_integer_zeros() {
        assert_eq!(format_numeric(1500.0), "1500");
        assert_eq!(format_numeric(10.5), "10.5");
        assert_eq!(CellValue::Number(0.25).render(), "0.25");
    }

    #[test]
    fn conformance_follows_kind() {
        let date = CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(date.conforms_to(FieldKind::Temporal));
        assert!(!date.conforms_to(FieldKind::Numeric));
        assert!(CellValue::Missing.conforms_to(FieldKind::Numeric));
        assert!(!CellValue::Text("abc".into()).conforms_to(FieldKind::Numeric));
    }
}
