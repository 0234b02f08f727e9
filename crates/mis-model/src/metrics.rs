//! Aggregation outputs handed to the presentation layer.
//!
//! These shapes are the stable boundary of the core: everything here is
//! plain data and serializes to JSON without loss.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CanonicalField;

/// Named scalar metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kpi {
    TotalOrders,
    TotalGmv,
    TotalRevenue,
    TotalCost,
    TotalUnits,
    /// Distinct non-missing customer values.
    TotalCustomers,
    /// `total_revenue - total_cost`.
    GrossMargin,
    /// `(total_revenue - total_cost) / total_revenue`, 0 without revenue.
    Margin,
    /// `total_revenue / total_orders`, 0 without orders.
    Aov,
    RowCount,
}

impl Kpi {
    pub const ALL: [Kpi; 10] = [
        Self::TotalOrders,
        Self::TotalGmv,
        Self::TotalRevenue,
        Self::TotalCost,
        Self::TotalUnits,
        Self::TotalCustomers,
        Self::GrossMargin,
        Self::Margin,
        Self::Aov,
        Self::RowCount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TotalOrders => "total_orders",
            Self::TotalGmv => "total_gmv",
            Self::TotalRevenue => "total_revenue",
            Self::TotalCost => "total_cost",
            Self::TotalUnits => "total_units",
            Self::TotalCustomers => "total_customers",
            Self::GrossMargin => "gross_margin",
            Self::Margin => "margin",
            Self::Aov => "aov",
            Self::RowCount => "row_count",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::TotalOrders => "Orders",
            Self::TotalGmv => "GMV",
            Self::TotalRevenue => "Revenue",
            Self::TotalCost => "Cost",
            Self::TotalUnits => "Units",
            Self::TotalCustomers => "Customers",
            Self::GrossMargin => "Gross Margin",
            Self::Margin => "Margin %",
            Self::Aov => "AOV",
            Self::RowCount => "Rows",
        }
    }

    /// Whether the value is a ratio rather than an amount.
    pub fn is_ratio(&self) -> bool {
        matches!(self, Self::Margin)
    }
}

impl fmt::Display for Kpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// KPI name to value. Always carries every [`Kpi`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KpiSet(BTreeMap<Kpi, f64>);

impl KpiSet {
    pub fn zeroed() -> Self {
        Self(Kpi::ALL.into_iter().map(|kpi| (kpi, 0.0)).collect())
    }

    pub fn get(&self, kpi: Kpi) -> f64 {
        self.0.get(&kpi).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, kpi: Kpi, value: f64) {
        self.0.insert(kpi, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Kpi, f64)> + '_ {
        self.0.iter().map(|(kpi, value)| (*kpi, *value))
    }

    pub fn is_all_zero(&self) -> bool {
        self.0.values().all(|value| *value == 0.0)
    }
}

impl Default for KpiSet {
    fn default() -> Self {
        Self::zeroed()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    /// Bucket key: category value or formatted time bucket.
    pub key: String,
    /// One value per series, in series order.
    pub values: Vec<f64>,
}

/// A grouped aggregation ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTable {
    pub title: String,
    pub group_by: CanonicalField,
    pub series: Vec<String>,
    pub rows: Vec<ChartRow>,
}

impl ChartTable {
    pub fn new(title: impl Into<String>, group_by: CanonicalField, series: Vec<String>) -> Self {
        Self {
            title: title.into(),
            group_by,
            series,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.key.as_str()).collect()
    }

    pub fn row(&self, key: &str) -> Option<&ChartRow> {
        self.rows.iter().find(|row| row.key == key)
    }

    pub fn series_index(&self, name: &str) -> Option<usize> {
        self.series.iter().position(|s| s == name)
    }

    /// Value of `series` in the bucket `key`.
    pub fn value(&self, key: &str, series: &str) -> Option<f64> {
        let idx = self.series_index(series)?;
        self.row(key).and_then(|row| row.values.get(idx).copied())
    }
}

/// Counts of rows dropped on the way to a KPI set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionSummary {
    pub total_rows: usize,
    /// Rows dropped because a mapped numeric or temporal cell failed coercion.
    pub unparseable_rows: usize,
    /// Per-field failure counts; one row may count under several fields.
    pub unparseable_by_field: BTreeMap<CanonicalField, usize>,
    /// Rows removed by the filter set.
    pub filtered_rows: usize,
    pub included_rows: usize,
}
