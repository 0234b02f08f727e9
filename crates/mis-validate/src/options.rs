use serde::{Deserialize, Serialize};

/// Thresholds for the data quality checks. Rates are fractions in `0..=1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Warn when more than this share of a numeric field's non-missing cells
    /// fail to parse.
    pub numeric_failure_threshold: f64,
    /// Warn when more than this share of a mapped field's cells are missing.
    pub null_rate_threshold: f64,
    /// Warn when the number of duplicate rows exceeds this count.
    pub duplicate_threshold: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            numeric_failure_threshold: 0.05,
            null_rate_threshold: 0.5,
            duplicate_threshold: 0,
        }
    }
}
