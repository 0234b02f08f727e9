//! Filtering, KPIs and grouped chart tables over a mapped MIS dataset.
//!
//! Every entry point takes the dataset, its validation report and the
//! request explicitly. A report with errors blocks aggregation.

mod engine;
mod error;
mod frame;
mod grouping;
mod kpis;
mod request;
mod select;

pub use engine::{Dashboard, compute, compute_chart, compute_kpi_set, ensure_sufficient};
pub use error::{AggregateError, Result};
pub use frame::{chart_to_frame, rows_to_frame, write_csv};
pub use grouping::group_rows;
pub use kpis::compute_kpis;
pub use request::{AggregationRequest, GroupOrder, GroupingSpec, Measure, sales_metric, time_axis};
pub use select::{Selection, row_date, select};
