pub mod cell;
pub mod dataset;
pub mod error;
pub mod field;
pub mod filter;
pub mod ids;
pub mod metrics;
pub mod report;

pub use cell::{CellValue, format_numeric};
pub use dataset::{MappedDataset, MappedRow, RawDataset};
pub use error::{ModelError, Result};
pub use field::{CanonicalField, FieldKind};
pub use filter::FilterSet;
pub use ids::DatasetId;
pub use metrics::{ChartRow, ChartTable, ExclusionSummary, Kpi, KpiSet};
pub use report::{CheckKind, Finding, Severity, ValidationReport};
