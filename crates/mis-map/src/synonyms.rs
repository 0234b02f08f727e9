//! Synonym table and matching thresholds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use mis_model::CanonicalField;

use crate::utils::header_tokens;

pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.88;

/// Tunable inputs of the column matcher.
///
/// `synonyms` replaces the default table wholesale when supplied, so a
/// config document lists every field it wants matched beyond its own name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub synonyms: BTreeMap<CanonicalField, Vec<String>>,
    /// Minimum Jaro-Winkler similarity for the fuzzy tier.
    pub fuzzy_threshold: f64,
    pub fuzzy_enabled: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            synonyms: default_synonyms(),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            fuzzy_enabled: true,
        }
    }
}

impl MatcherConfig {
    pub fn synonyms_for(&self, field: CanonicalField) -> &[String] {
        self.synonyms
            .get(&field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn without_fuzzy(mut self) -> Self {
        self.fuzzy_enabled = false;
        self
    }
}

/// Built-in synonyms, one list per field.
pub fn default_synonyms() -> BTreeMap<CanonicalField, Vec<String>> {
    let table: [(CanonicalField, &[&str]); 13] = [
        (
            CanonicalField::Date,
            &["date", "txn_date", "transaction_date", "order_date", "day"],
        ),
        (CanonicalField::Week, &["week", "week_start", "wk"]),
        (CanonicalField::Month, &["month", "period"]),
        (CanonicalField::Segment, &["segment", "customer_segment"]),
        (
            CanonicalField::Region,
            &["region", "state", "zone", "territory"],
        ),
        (CanonicalField::Channel, &["channel", "sales_channel"]),
        (
            CanonicalField::Product,
            &["product", "sku", "item_name", "item"],
        ),
        (
            CanonicalField::Orders,
            &["orders", "order_count", "num_orders"],
        ),
        (CanonicalField::Units, &["units", "qty", "quantity"]),
        (
            CanonicalField::Gmv,
            &["gmv", "gross_sales", "sales_value", "gross_merchandise_value"],
        ),
        (CanonicalField::Revenue, &["revenue", "net_sales", "sales"]),
        (CanonicalField::Cost, &["cost", "cogs", "expenses"]),
        (
            CanonicalField::Customers,
            &["customers", "unique_customers", "active_users"],
        ),
    ];
    table
        .into_iter()
        .map(|(field, words)| (field, words.iter().map(|w| (*w).to_string()).collect()))
        .collect()
}

/// Normalized token patterns for one field: its own name, then each synonym.
#[derive(Debug, Clone)]
pub(crate) struct FieldPatterns {
    pub field: CanonicalField,
    pub patterns: Vec<Vec<String>>,
}

pub(crate) fn build_patterns(config: &MatcherConfig) -> Vec<FieldPatterns> {
    CanonicalField::ALL
        .into_iter()
        .map(|field| {
            let mut patterns: Vec<Vec<String>> = Vec::new();
            let names = std::iter::once(field.as_str()).chain(
                config
                    .synonyms_for(field)
                    .iter()
                    .map(String::as_str),
            );
            for name in names {
                let tokens = header_tokens(name);
                if !tokens.is_empty() && !patterns.contains(&tokens) {
                    patterns.push(tokens);
                }
            }
            FieldPatterns { field, patterns }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_has_default_synonyms() {
        let config = MatcherConfig::default();
        for field in CanonicalField::ALL {
            assert!(!config.synonyms_for(field).is_empty(), "{field}");
        }
    }

    #[test]
    fn patterns_are_normalized_and_deduplicated() {
        let patterns = build_patterns(&MatcherConfig::default());
        let orders = patterns
            .iter()
            .find(|p| p.field == CanonicalField::Orders)
            .unwrap();
        // "orders" and the field name "orders" collapse to one pattern.
        assert_eq!(orders.patterns[0], vec!["order".to_string()]);
        assert_eq!(orders.patterns.len(), 3);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = MatcherConfig::default().without_fuzzy();
        let json = serde_json::to_string(&config).unwrap();
        let back: MatcherConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
        let partial: MatcherConfig = serde_json::from_str(r#"{"fuzzy_threshold":0.9}"#).unwrap();
        assert_eq!(partial.fuzzy_threshold, 0.9);
        assert_eq!(partial.synonyms, default_synonyms());
    }
}
