use std::collections::BTreeSet;

use mis_model::{CanonicalField, CellValue, Kpi, KpiSet, MappedDataset, MappedRow};

/// Sum of a numeric field over `rows`; missing cells add nothing.
pub(crate) fn sum(dataset: &MappedDataset, rows: &[&MappedRow], field: CanonicalField) -> f64 {
    rows.iter()
        .filter_map(|row| dataset.get(row, field).and_then(CellValue::as_number))
        .sum()
}

/// Number of distinct numeric values of `field` over `rows`.
fn distinct(dataset: &MappedDataset, rows: &[&MappedRow], field: CanonicalField) -> usize {
    rows.iter()
        .filter_map(|row| dataset.get(row, field).and_then(CellValue::as_number))
        // -0.0 and 0.0 are the same customer count.
        .map(|value| (value + 0.0).to_bits())
        .collect::<BTreeSet<u64>>()
        .len()
}

/// `numerator / denominator`, or 0 when the result would not be finite.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let value = numerator / denominator;
    if value.is_finite() { value } else { 0.0 }
}

fn finite(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// KPIs over already selected rows. Unmapped fields total 0.
///
/// Customers are counted, not summed: each distinct value is one.
pub fn compute_kpis(dataset: &MappedDataset, rows: &[&MappedRow]) -> KpiSet {
    let total = |field| finite(sum(dataset, rows, field));

    let orders = total(CanonicalField::Orders);
    let revenue = total(CanonicalField::Revenue);
    let cost = total(CanonicalField::Cost);

    let mut kpis = KpiSet::zeroed();
    kpis.set(Kpi::TotalOrders, orders);
    kpis.set(Kpi::TotalGmv, total(CanonicalField::Gmv));
    kpis.set(Kpi::TotalRevenue, revenue);
    kpis.set(Kpi::TotalCost, cost);
    kpis.set(Kpi::TotalUnits, total(CanonicalField::Units));
    kpis.set(
        Kpi::TotalCustomers,
        distinct(dataset, rows, CanonicalField::Customers) as f64,
    );
    kpis.set(Kpi::GrossMargin, finite(revenue - cost));
    kpis.set(Kpi::Margin, ratio(revenue - cost, revenue));
    kpis.set(Kpi::Aov, ratio(revenue, orders));
    kpis.set(Kpi::RowCount, rows.len() as f64);
    kpis
}
