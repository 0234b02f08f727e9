use mis_model::RawDataset;

use crate::csv_table::read_csv_str;
use crate::error::Result;

pub const SAMPLE_SOURCE: &str = "sample_mis.csv";

const SAMPLE_CSV: &str = include_str!("../assets/sample_mis.csv");

/// The bundled demo dataset, used when no file is supplied.
pub fn sample_dataset() -> Result<RawDataset> {
    read_csv_str(SAMPLE_SOURCE, SAMPLE_CSV)
}
