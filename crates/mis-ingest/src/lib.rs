//! MIS data ingestion.
//!
//! Reads tabular sales data into a [`RawDataset`](mis_model::RawDataset):
//!
//! - **CSV**: flexible row lengths, blank lines skipped, every cell as text
//! - **Spreadsheets** (`xlsx`, `xlsm`, `xls`, `xlsb`, `ods`): typed cells,
//!   first sheet unless one is named
//! - **Sample**: a bundled demo file for running without input
//!
//! The [`coerce`] module turns loosely typed cells into the kind a canonical
//! field expects; the mapper applies it during projection.

pub mod coerce;
mod csv_table;
mod error;
mod header;
mod load;
mod sample;
mod workbook;

pub use coerce::{
    CoercionOptions, bucket_key, bucket_start, coerce_cell, month_start, parse_date, parse_month,
    parse_number, parse_week, week_start,
};
pub use csv_table::{read_csv_dataset, read_csv_str};
pub use error::{IngestError, Result};
pub use header::{normalize_header, unique_headers};
pub use load::{FileFormat, LoadOptions, load_dataset};
pub use sample::{SAMPLE_SOURCE, sample_dataset};
pub use workbook::read_workbook_dataset;
