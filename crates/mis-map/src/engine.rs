//! Column mapping engine.
//!
//! Suggestion runs in three tiers (exact, contains, fuzzy). Each tier walks
//! the canonical fields in order and claims the first unclaimed column that
//! matches, so a better tier always wins and each column serves one field.

use rapidfuzz::distance::jaro_winkler;
use tracing::debug;

use mis_model::CanonicalField;

use crate::mapping::{ColumnMapping, MatchTier};
use crate::synonyms::{FieldPatterns, MatcherConfig, build_patterns};
use crate::utils::{compact, contains_sequence, header_tokens};
use crate::warning::MappingWarning;

/// A mapping together with the warnings produced while building it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingOutcome {
    pub mapping: ColumnMapping,
    pub warnings: Vec<MappingWarning>,
}

/// Suggests mappings for source headers.
///
/// # Example
///
/// ```
/// use mis_map::ColumnMapper;
/// use mis_model::CanonicalField;
///
/// let mapper = ColumnMapper::default();
/// let headers = vec!["Txn Date".to_string(), "Net Sales".to_string()];
/// let outcome = mapper.suggest(&headers);
/// assert_eq!(outcome.mapping.source_for(CanonicalField::Revenue), Some("Net Sales"));
/// ```
#[derive(Debug, Clone)]
pub struct ColumnMapper {
    config: MatcherConfig,
    patterns: Vec<FieldPatterns>,
}

impl Default for ColumnMapper {
    fn default() -> Self {
        Self::new(MatcherConfig::default())
    }
}

struct Column {
    name: String,
    tokens: Vec<String>,
    compact: String,
}

impl ColumnMapper {
    pub fn new(config: MatcherConfig) -> Self {
        let patterns = build_patterns(&config);
        Self { config, patterns }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Best-effort mapping from scratch.
    pub fn suggest(&self, headers: &[String]) -> MappingOutcome {
        self.fill(ColumnMapping::new(), headers)
    }

    /// Recomputes auto bindings, leaving manual ones untouched.
    ///
    /// Columns held by manual bindings are never offered to other fields.
    pub fn refresh(&self, mapping: &ColumnMapping, headers: &[String]) -> MappingOutcome {
        self.fill(mapping.manual_only(), headers)
    }

    /// Tier at which `header` matches `field`, if any.
    pub fn match_tier(&self, field: CanonicalField, header: &str) -> Option<MatchTier> {
        let column = Column::new(header);
        MatchTier::ALL
            .into_iter()
            .find(|tier| self.matches(field, &column, *tier))
    }

    fn fill(&self, mut mapping: ColumnMapping, headers: &[String]) -> MappingOutcome {
        let columns: Vec<Column> = headers.iter().map(|h| Column::new(h)).collect();
        let mut claimed: Vec<bool> = headers
            .iter()
            .map(|h| mapping.field_for_source(h).is_some())
            .collect();
        let mut warnings = Vec::new();

        for tier in MatchTier::ALL {
            if tier == MatchTier::Fuzzy && !self.config.fuzzy_enabled {
                continue;
            }
            for field in CanonicalField::ALL {
                if mapping.binding(field).is_some() {
                    continue;
                }
                let candidates: Vec<usize> = columns
                    .iter()
                    .enumerate()
                    .filter(|(idx, column)| !claimed[*idx] && self.matches(field, column, tier))
                    .map(|(idx, _)| idx)
                    .collect();
                let Some((&chosen, rest)) = candidates.split_first() else {
                    continue;
                };
                claimed[chosen] = true;
                mapping.set_auto(field, &columns[chosen].name, tier);
                debug!(field = %field, column = %columns[chosen].name, tier = %tier, "auto-mapped");
                if !rest.is_empty() {
                    warnings.push(MappingWarning::Conflict {
                        field,
                        tier,
                        chosen: columns[chosen].name.clone(),
                        passed_over: rest.iter().map(|idx| columns[*idx].name.clone()).collect(),
                    });
                }
            }
        }
        MappingOutcome { mapping, warnings }
    }

    fn matches(&self, field: CanonicalField, column: &Column, tier: MatchTier) -> bool {
        if column.tokens.is_empty() {
            return false;
        }
        let Some(entry) = self.patterns.iter().find(|p| p.field == field) else {
            return false;
        };
        match tier {
            MatchTier::Exact => entry.patterns.iter().any(|p| *p == column.tokens),
            MatchTier::Contains => entry
                .patterns
                .iter()
                .any(|p| contains_sequence(&column.tokens, p)),
            MatchTier::Fuzzy => entry.patterns.iter().any(|p| {
                jaro_winkler::similarity(column.compact.chars(), compact(p).chars())
                    >= self.config.fuzzy_threshold
            }),
        }
    }
}

impl Column {
    fn new(name: &str) -> Self {
        let tokens = header_tokens(name);
        let compact = compact(&tokens);
        Self {
            name: name.to_string(),
            tokens,
            compact,
        }
    }
}
