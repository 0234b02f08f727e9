//! What to aggregate: grouping specs and the request that bundles them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use mis_model::{CanonicalField, FilterSet, MappedDataset};

use crate::error::AggregateError;

/// One series of a grouped table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Sum(CanonicalField),
    /// Mean over non-missing cells; 0 for a bucket with none.
    Mean(CanonicalField),
    /// Rows in the bucket.
    Count,
}

impl Measure {
    /// Series name in the resulting table.
    pub fn series_name(&self) -> String {
        match self {
            Self::Sum(field) => field.as_str().to_string(),
            Self::Mean(field) => format!("mean_{field}"),
            Self::Count => "count".to_string(),
        }
    }

    pub fn field(&self) -> Option<CanonicalField> {
        match self {
            Self::Sum(field) | Self::Mean(field) => Some(*field),
            Self::Count => None,
        }
    }

    fn label(&self) -> String {
        match self {
            Self::Sum(field) => field.label().to_string(),
            Self::Mean(field) => format!("Average {}", field.label()),
            Self::Count => "Rows".to_string(),
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sum(field) => write!(f, "sum({field})"),
            Self::Mean(field) => write!(f, "mean({field})"),
            Self::Count => f.write_str("count"),
        }
    }
}

/// Parses `sum(revenue)`, `mean(cost)`, `count`, or a bare field name as a sum.
impl FromStr for Measure {
    type Err = AggregateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let text = value.trim().to_ascii_lowercase();
        if text == "count" {
            return Ok(Self::Count);
        }
        let invalid = || AggregateError::InvalidMeasure(value.to_string());
        let (func, field) = match text.split_once('(') {
            Some((func, rest)) => (func.trim(), rest.strip_suffix(')').ok_or_else(invalid)?),
            None => ("sum", text.as_str()),
        };
        let field: CanonicalField = field.parse().map_err(|_| invalid())?;
        match func {
            "sum" => Ok(Self::Sum(field)),
            "mean" | "avg" => Ok(Self::Mean(field)),
            _ => Err(invalid()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOrder {
    /// Chronological for temporal keys, first-seen for categorical ones.
    #[default]
    Natural,
    /// Ascending by key.
    Key,
    /// Descending by the named series; ties by key.
    ValueDesc(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingSpec {
    pub by: CanonicalField,
    pub measures: Vec<Measure>,
    #[serde(default)]
    pub order: GroupOrder,
    /// Keep the first `limit` rows after ordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl GroupingSpec {
    pub fn new(by: CanonicalField, measures: Vec<Measure>) -> Self {
        Self {
            by,
            measures,
            order: GroupOrder::Natural,
            limit: None,
            title: None,
        }
    }

    #[must_use]
    pub fn ordered(mut self, order: GroupOrder) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn limited(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Explicit title, or one built from the measures and key.
    pub fn resolved_title(&self) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }
        let measures: Vec<String> = self.measures.iter().map(Measure::label).collect();
        format!("{} by {}", measures.join(", "), self.by.label())
    }
}

/// Revenue when mapped, else GMV.
pub fn sales_metric(dataset: &MappedDataset) -> Option<CanonicalField> {
    [CanonicalField::Revenue, CanonicalField::Gmv]
        .into_iter()
        .find(|field| dataset.is_mapped(*field))
}

/// First mapped time axis: date, then month, then week.
pub fn time_axis(dataset: &MappedDataset) -> Option<CanonicalField> {
    CanonicalField::TEMPORAL
        .into_iter()
        .find(|field| dataset.is_mapped(*field))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationRequest {
    #[serde(default)]
    pub filters: FilterSet,
    #[serde(default)]
    pub groupings: Vec<GroupingSpec>,
}

impl AggregationRequest {
    pub fn new(filters: FilterSet, groupings: Vec<GroupingSpec>) -> Self {
        Self { filters, groupings }
    }

    /// The standard dashboard, limited to charts whose fields are mapped.
    ///
    /// Sales metric and orders over time, the sales metric by segment,
    /// region and channel (largest first) and the top 10 products.
    pub fn dashboard_default(dataset: &MappedDataset, filters: FilterSet) -> Self {
        let metric = sales_metric(dataset);
        let time = time_axis(dataset);
        let mut groupings = Vec::new();

        if let (Some(metric), Some(time)) = (metric, time) {
            groupings.push(
                GroupingSpec::new(time, vec![Measure::Sum(metric)])
                    .titled(format!("{} over time", metric.label())),
            );
        }
        if let Some(time) = time
            && dataset.is_mapped(CanonicalField::Orders)
        {
            groupings.push(
                GroupingSpec::new(time, vec![Measure::Sum(CanonicalField::Orders)])
                    .titled("Orders over time"),
            );
        }
        if let Some(metric) = metric {
            for by in [
                CanonicalField::Segment,
                CanonicalField::Region,
                CanonicalField::Channel,
            ] {
                if dataset.is_mapped(by) {
                    groupings.push(
                        GroupingSpec::new(by, vec![Measure::Sum(metric)])
                            .ordered(GroupOrder::ValueDesc(metric.as_str().to_string())),
                    );
                }
            }
            if dataset.is_mapped(CanonicalField::Product) {
                groupings.push(
                    GroupingSpec::new(CanonicalField::Product, vec![Measure::Sum(metric)])
                        .ordered(GroupOrder::ValueDesc(metric.as_str().to_string()))
                        .limited(10)
                        .titled(format!("Top 10 products by {}", metric.label())),
                );
            }
        }
        Self { filters, groupings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_parse_from_text() {
        assert_eq!(
            "sum(revenue)".parse::<Measure>().unwrap(),
            Measure::Sum(CanonicalField::Revenue)
        );
        assert_eq!(
            "Mean( Cost )".parse::<Measure>().unwrap(),
            Measure::Mean(CanonicalField::Cost)
        );
        assert_eq!("orders".parse::<Measure>().unwrap(), Measure::Sum(CanonicalField::Orders));
        assert_eq!("COUNT".parse::<Measure>().unwrap(), Measure::Count);
        assert!("max(cost)".parse::<Measure>().is_err());
        assert!("sum(profit)".parse::<Measure>().is_err());
        assert!("sum(cost".parse::<Measure>().is_err());
    }

    #[test]
    fn default_title_names_measures_and_key() {
        let spec = GroupingSpec::new(
            CanonicalField::Month,
            vec![Measure::Sum(CanonicalField::Revenue), Measure::Count],
        );
        assert_eq!(spec.resolved_title(), "Revenue, Rows by Month");
    }

    #[test]
    fn spec_serializes_in_snake_case() {
        let spec = GroupingSpec::new(CanonicalField::Channel, vec![Measure::Sum(CanonicalField::Gmv)])
            .ordered(GroupOrder::ValueDesc("gmv".into()));
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["by"], "channel");
        assert_eq!(json["measures"][0]["sum"], "gmv");
        assert_eq!(json["order"]["value_desc"], "gmv");
    }
}
