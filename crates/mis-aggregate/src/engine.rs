use serde::Serialize;
use tracing::{debug, info};

use mis_model::{ChartTable, ExclusionSummary, FilterSet, KpiSet, MappedDataset, ValidationReport};

use crate::error::{AggregateError, Result};
use crate::grouping::group_rows;
use crate::kpis::compute_kpis;
use crate::request::{AggregationRequest, GroupingSpec};
use crate::select::select;

/// KPIs and chart tables for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub kpis: KpiSet,
    pub charts: Vec<ChartTable>,
    pub exclusions: ExclusionSummary,
}

/// Refuses to aggregate a dataset whose report carries errors.
pub fn ensure_sufficient(report: &ValidationReport) -> Result<()> {
    if !report.has_errors() {
        return Ok(());
    }
    let blocking = report.errors().map(|f| f.message.clone()).collect();
    Err(AggregateError::InsufficientData { blocking })
}

/// KPIs over the filtered rows, with the exclusion counts.
pub fn compute_kpi_set(
    dataset: &MappedDataset,
    report: &ValidationReport,
    filters: &FilterSet,
) -> Result<(KpiSet, ExclusionSummary)> {
    ensure_sufficient(report)?;
    let selection = select(dataset, filters)?;
    Ok((compute_kpis(dataset, &selection.rows), selection.summary))
}

/// One chart table over the filtered rows.
pub fn compute_chart(
    dataset: &MappedDataset,
    report: &ValidationReport,
    filters: &FilterSet,
    spec: &GroupingSpec,
) -> Result<ChartTable> {
    ensure_sufficient(report)?;
    let selection = select(dataset, filters)?;
    group_rows(dataset, &selection.rows, spec)
}

/// Runs the whole request: gate, selection, KPIs, then each grouping in order.
pub fn compute(
    dataset: &MappedDataset,
    report: &ValidationReport,
    request: &AggregationRequest,
) -> Result<Dashboard> {
    ensure_sufficient(report)?;
    let selection = select(dataset, &request.filters)?;
    let kpis = compute_kpis(dataset, &selection.rows);

    let charts = request
        .groupings
        .iter()
        .map(|spec| {
            let table = group_rows(dataset, &selection.rows, spec)?;
            debug!(title = %table.title, buckets = table.len(), "grouped rows");
            Ok(table)
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        rows = selection.summary.included_rows,
        excluded = selection.summary.unparseable_rows,
        filtered = selection.summary.filtered_rows,
        charts = charts.len(),
        "computed dashboard"
    );
    Ok(Dashboard {
        kpis,
        charts,
        exclusions: selection.summary,
    })
}
