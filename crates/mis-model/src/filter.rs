use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{CanonicalField, ModelError};

/// Row constraints applied before aggregation, combined with AND.
///
/// An empty value set leaves that field unconstrained. The date range is
/// inclusive on both ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSet {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub segments: BTreeSet<String>,
    pub regions: BTreeSet<String>,
    pub channels: BTreeSet<String>,
    pub products: BTreeSet<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Allows `value` for a categorical field.
    pub fn allow(
        mut self,
        field: CanonicalField,
        value: impl Into<String>,
    ) -> Result<Self, ModelError> {
        self.values_mut(field)?.insert(value.into());
        Ok(self)
    }

    pub fn has_date_range(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    pub fn date_in_range(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    /// Allowed values for a categorical field; `None` for other kinds.
    pub fn values_for(&self, field: CanonicalField) -> Option<&BTreeSet<String>> {
        match field {
            CanonicalField::Segment => Some(&self.segments),
            CanonicalField::Region => Some(&self.regions),
            CanonicalField::Channel => Some(&self.channels),
            CanonicalField::Product => Some(&self.products),
            _ => None,
        }
    }

    fn values_mut(&mut self, field: CanonicalField) -> Result<&mut BTreeSet<String>, ModelError> {
        match field {
            CanonicalField::Segment => Ok(&mut self.segments),
            CanonicalField::Region => Ok(&mut self.regions),
            CanonicalField::Channel => Ok(&mut self.channels),
            CanonicalField::Product => Ok(&mut self.products),
            other => Err(ModelError::NotCategorical {
                field: other.to_string(),
            }),
        }
    }

    /// Categorical fields carrying at least one allowed value.
    pub fn constrained_fields(&self) -> Vec<CanonicalField> {
        [
            CanonicalField::Segment,
            CanonicalField::Region,
            CanonicalField::Channel,
            CanonicalField::Product,
        ]
        .into_iter()
        .filter(|field| self.values_for(*field).is_some_and(|set| !set.is_empty()))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_date_range() && self.constrained_fields().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_rejects_non_categorical_fields() {
        let err = FilterSet::new().allow(CanonicalField::Revenue, "1").unwrap_err();
        assert_eq!(
            err,
            ModelError::NotCategorical {
                field: "revenue".into()
            }
        );
    }

    #[test]
    fn date_range_is_inclusive() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let filters = FilterSet::new().with_date_range(Some(day(2)), Some(day(4)));
        assert!(!filters.date_in_range(day(1)));
        assert!(filters.date_in_range(day(2)));
        assert!(filters.date_in_range(day(4)));
        assert!(!filters.date_in_range(day(5)));
    }

    #[test]
    fn constrained_fields_skip_empty_sets() {
        let filters = FilterSet::new()
            .allow(CanonicalField::Channel, "web")
            .unwrap();
        assert_eq!(filters.constrained_fields(), vec![CanonicalField::Channel]);
        assert!(!filters.is_empty());
        assert!(FilterSet::new().is_empty());
    }
}
