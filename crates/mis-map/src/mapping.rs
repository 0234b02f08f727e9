//! The field-to-column mapping and its bindings.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use mis_model::CanonicalField;

use crate::error::{MapError, Result};
use crate::utils::find_column;

/// How an auto binding was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Exact,
    Contains,
    Fuzzy,
}

impl MatchTier {
    pub const ALL: [MatchTier; 3] = [Self::Exact, Self::Contains, Self::Fuzzy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Contains => "contains",
            Self::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingOrigin {
    Auto,
    Manual,
}

/// A field's binding: a source column or explicitly nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub source: Option<String>,
    pub origin: BindingOrigin,
    /// Set for auto bindings only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<MatchTier>,
}

impl Binding {
    pub fn auto(source: impl Into<String>, tier: MatchTier) -> Self {
        Self {
            source: Some(source.into()),
            origin: BindingOrigin::Auto,
            tier: Some(tier),
        }
    }

    pub fn manual(source: Option<String>) -> Self {
        Self {
            source,
            origin: BindingOrigin::Manual,
            tier: None,
        }
    }

    pub fn is_manual(&self) -> bool {
        self.origin == BindingOrigin::Manual
    }
}

/// Canonical field to source column mapping.
///
/// Keyed by field, so a field never has two sources. A field with no entry
/// is unmapped and free for suggestion; a manual entry with no source is
/// unmapped on purpose and stays that way across refreshes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    bindings: BTreeMap<CanonicalField, Binding>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn binding(&self, field: CanonicalField) -> Option<&Binding> {
        self.bindings.get(&field)
    }

    pub fn source_for(&self, field: CanonicalField) -> Option<&str> {
        self.bindings
            .get(&field)
            .and_then(|binding| binding.source.as_deref())
    }

    pub fn is_mapped(&self, field: CanonicalField) -> bool {
        self.source_for(field).is_some()
    }

    pub fn is_manual(&self, field: CanonicalField) -> bool {
        self.bindings.get(&field).is_some_and(Binding::is_manual)
    }

    /// The field currently bound to `column`, if any.
    pub fn field_for_source(&self, column: &str) -> Option<CanonicalField> {
        self.bindings
            .iter()
            .find(|(_, binding)| binding.source.as_deref() == Some(column))
            .map(|(field, _)| *field)
    }

    /// Fields with a source, in canonical order.
    pub fn mapped_fields(&self) -> Vec<CanonicalField> {
        self.bindings
            .iter()
            .filter(|(_, binding)| binding.source.is_some())
            .map(|(field, _)| *field)
            .collect()
    }

    /// Every canonical field with its source, in canonical order.
    pub fn sources(&self) -> Vec<(CanonicalField, Option<&str>)> {
        CanonicalField::ALL
            .into_iter()
            .map(|field| (field, self.source_for(field)))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &Binding)> {
        self.bindings.iter().map(|(field, binding)| (*field, binding))
    }

    /// Records a user choice for `field`.
    ///
    /// A column already bound to another field is moved: that field becomes
    /// unmapped, manual or auto as it was.
    pub fn set_manual(&mut self, field: CanonicalField, source: Option<String>) {
        if let Some(column) = source.as_deref()
            && let Some(other) = self.field_for_source(column)
            && other != field
        {
            self.clear_source(other);
        }
        self.bindings.insert(field, Binding::manual(source));
    }

    /// Resolves `column` against `headers` before recording it manually.
    pub fn bind_column(
        &mut self,
        field: CanonicalField,
        column: Option<&str>,
        headers: &[String],
    ) -> Result<()> {
        let source = match column {
            Some(name) => {
                let idx = find_column(headers, name).ok_or_else(|| MapError::ColumnNotFound {
                    column: name.to_string(),
                })?;
                Some(headers[idx].clone())
            }
            None => None,
        };
        self.set_manual(field, source);
        Ok(())
    }

    pub(crate) fn set_auto(&mut self, field: CanonicalField, source: &str, tier: MatchTier) {
        self.bindings.insert(field, Binding::auto(source, tier));
    }

    fn clear_source(&mut self, field: CanonicalField) {
        match self.bindings.get_mut(&field) {
            Some(binding) if binding.is_manual() => binding.source = None,
            Some(_) => {
                self.bindings.remove(&field);
            }
            None => {}
        }
    }

    /// Drops auto bindings, keeping manual ones.
    pub(crate) fn manual_only(&self) -> Self {
        Self {
            bindings: self
                .bindings
                .iter()
                .filter(|(_, binding)| binding.is_manual())
                .map(|(field, binding)| (*field, binding.clone()))
                .collect(),
        }
    }

    /// Clears every binding, manual ones included.
    pub fn reset(&mut self) {
        self.bindings.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Owned `(field, source)` pairs for mapped fields; used as a cache key.
    pub fn key(&self) -> Vec<(CanonicalField, String)> {
        self.bindings
            .iter()
            .filter_map(|(field, binding)| binding.source.clone().map(|source| (*field, source)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_binding_moves_a_claimed_column() {
        let mut mapping = ColumnMapping::new();
        mapping.set_auto(CanonicalField::Revenue, "Sales", MatchTier::Contains);
        mapping.set_manual(CanonicalField::Gmv, Some("Sales".into()));
        assert_eq!(mapping.source_for(CanonicalField::Gmv), Some("Sales"));
        assert_eq!(mapping.source_for(CanonicalField::Revenue), None);
        assert!(mapping.binding(CanonicalField::Revenue).is_none());
    }

    #[test]
    fn moving_from_a_manual_field_leaves_it_explicitly_unmapped() {
        let mut mapping = ColumnMapping::new();
        mapping.set_manual(CanonicalField::Revenue, Some("Sales".into()));
        mapping.set_manual(CanonicalField::Gmv, Some("Sales".into()));
        assert!(mapping.is_manual(CanonicalField::Revenue));
        assert_eq!(mapping.source_for(CanonicalField::Revenue), None);
    }

    #[test]
    fn bind_column_resolves_case_insensitively() {
        let headers = vec!["Net Sales".to_string()];
        let mut mapping = ColumnMapping::new();
        mapping
            .bind_column(CanonicalField::Revenue, Some("net sales"), &headers)
            .unwrap();
        assert_eq!(mapping.source_for(CanonicalField::Revenue), Some("Net Sales"));
        let err = mapping
            .bind_column(CanonicalField::Cost, Some("COGS"), &headers)
            .unwrap_err();
        assert!(matches!(err, MapError::ColumnNotFound { .. }));
    }

    #[test]
    fn reset_clears_manual_bindings() {
        let mut mapping = ColumnMapping::new();
        mapping.set_manual(CanonicalField::Date, None);
        mapping.reset();
        assert!(mapping.is_empty());
    }
}
