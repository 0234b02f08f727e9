//! The fixed schema every source column is mapped onto.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Semantic kind of a canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Dates and date buckets (day, ISO week, month).
    Temporal,
    /// Free-text dimensions used for filtering and grouping.
    Categorical,
    /// Additive measures.
    Numeric,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temporal => "temporal",
            Self::Categorical => "categorical",
            Self::Numeric => "numeric",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A semantic role the dashboard understands regardless of source naming.
///
/// Declaration order is the canonical display order; `Ord` follows it, so a
/// `BTreeMap<CanonicalField, _>` always iterates in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalField {
    Date,
    Week,
    Month,
    Segment,
    Region,
    Channel,
    Product,
    Orders,
    Gmv,
    Revenue,
    Cost,
    Units,
    Customers,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 13] = [
        Self::Date,
        Self::Week,
        Self::Month,
        Self::Segment,
        Self::Region,
        Self::Channel,
        Self::Product,
        Self::Orders,
        Self::Gmv,
        Self::Revenue,
        Self::Cost,
        Self::Units,
        Self::Customers,
    ];

    /// Temporal fields in order of preference when a row's date is needed.
    pub const TEMPORAL: [CanonicalField; 3] = [Self::Date, Self::Month, Self::Week];

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Date | Self::Week | Self::Month => FieldKind::Temporal,
            Self::Segment | Self::Region | Self::Channel | Self::Product => {
                FieldKind::Categorical
            }
            Self::Orders
            | Self::Gmv
            | Self::Revenue
            | Self::Cost
            | Self::Units
            | Self::Customers => FieldKind::Numeric,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Week => "week",
            Self::Month => "month",
            Self::Segment => "segment",
            Self::Region => "region",
            Self::Channel => "channel",
            Self::Product => "product",
            Self::Orders => "orders",
            Self::Gmv => "gmv",
            Self::Revenue => "revenue",
            Self::Cost => "cost",
            Self::Units => "units",
            Self::Customers => "customers",
        }
    }

    /// Display label used in tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Week => "Week",
            Self::Month => "Month",
            Self::Segment => "Segment",
            Self::Region => "Region",
            Self::Channel => "Channel",
            Self::Product => "Product",
            Self::Orders => "Orders",
            Self::Gmv => "GMV",
            Self::Revenue => "Revenue",
            Self::Cost => "Cost",
            Self::Units => "Units",
            Self::Customers => "Customers",
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind() == FieldKind::Numeric
    }

    pub fn is_temporal(&self) -> bool {
        self.kind() == FieldKind::Temporal
    }

    pub fn is_categorical(&self) -> bool {
        self.kind() == FieldKind::Categorical
    }

    pub fn of_kind(kind: FieldKind) -> impl Iterator<Item = CanonicalField> {
        Self::ALL.into_iter().filter(move |field| field.kind() == kind)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownField(value.to_string()))
    }
}
