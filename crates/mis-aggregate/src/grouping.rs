//! Grouped chart tables.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;

use mis_ingest::{bucket_key, bucket_start};
use mis_model::{CanonicalField, CellValue, ChartRow, ChartTable, MappedDataset, MappedRow};

use crate::error::{AggregateError, Result};
use crate::kpis::ratio;
use crate::request::{GroupOrder, GroupingSpec, Measure};

/// Where a row's bucket key comes from.
#[derive(Debug, Clone, Copy)]
enum KeySource {
    Category(CanonicalField),
    /// Temporal bucket of `by`, read from the `from` column.
    Time {
        by: CanonicalField,
        from: CanonicalField,
    },
}

impl KeySource {
    fn resolve(dataset: &MappedDataset, by: CanonicalField) -> Result<Self> {
        if by.is_numeric() {
            return Err(AggregateError::NotGroupable { field: by });
        }
        if by.is_categorical() {
            return if dataset.is_mapped(by) {
                Ok(Self::Category(by))
            } else {
                Err(AggregateError::FieldNotMapped { field: by })
            };
        }
        if dataset.is_mapped(by) {
            return Ok(Self::Time { by, from: by });
        }
        // Week and month buckets can be derived from a daily date.
        if by != CanonicalField::Date && dataset.is_mapped(CanonicalField::Date) {
            return Ok(Self::Time {
                by,
                from: CanonicalField::Date,
            });
        }
        Err(AggregateError::FieldNotMapped { field: by })
    }

    /// Bucket key and, for time buckets, the bucket start used for ordering.
    fn key(self, dataset: &MappedDataset, row: &MappedRow) -> Option<(String, Option<NaiveDate>)> {
        match self {
            Self::Category(field) => {
                let cell = dataset.get(row, field)?;
                if cell.is_missing() {
                    return None;
                }
                Some((cell.render().trim().to_string(), None))
            }
            Self::Time { by, from } => {
                let date = dataset.get(row, from).and_then(CellValue::as_date)?;
                Some((bucket_key(by, date), Some(bucket_start(by, date))))
            }
        }
    }
}

#[derive(Debug)]
struct Bucket {
    key: String,
    start: Option<NaiveDate>,
    rows: usize,
    sums: Vec<f64>,
    counts: Vec<usize>,
}

impl Bucket {
    fn new(key: String, start: Option<NaiveDate>, measures: usize) -> Self {
        Self {
            key,
            start,
            rows: 0,
            sums: vec![0.0; measures],
            counts: vec![0; measures],
        }
    }

    fn values(&self, measures: &[Measure]) -> Vec<f64> {
        measures
            .iter()
            .enumerate()
            .map(|(idx, measure)| match measure {
                Measure::Sum(_) => self.sums[idx],
                Measure::Mean(_) => ratio(self.sums[idx], self.counts[idx] as f64),
                Measure::Count => self.rows as f64,
            })
            .map(|value| if value.is_finite() { value } else { 0.0 })
            .collect()
    }
}

fn check_measures(dataset: &MappedDataset, measures: &[Measure]) -> Result<()> {
    for field in measures.iter().filter_map(Measure::field) {
        if !field.is_numeric() {
            return Err(AggregateError::NotNumeric { field });
        }
        if !dataset.is_mapped(field) {
            return Err(AggregateError::FieldNotMapped { field });
        }
    }
    Ok(())
}

fn order_rows(
    buckets: &mut [Bucket],
    table: &mut ChartTable,
    spec: &GroupingSpec,
) -> Result<()> {
    let mut rows: Vec<(ChartRow, Option<NaiveDate>)> = buckets
        .iter_mut()
        .map(|bucket| {
            let values = bucket.values(&spec.measures);
            (
                ChartRow {
                    key: std::mem::take(&mut bucket.key),
                    values,
                },
                bucket.start,
            )
        })
        .collect();

    match &spec.order {
        // Categorical buckets are already in first-seen order.
        GroupOrder::Natural => rows.sort_by(|(a, a_start), (b, b_start)| {
            a_start.cmp(b_start).then_with(|| {
                if a_start.is_some() {
                    a.key.cmp(&b.key)
                } else {
                    Ordering::Equal
                }
            })
        }),
        GroupOrder::Key => rows.sort_by(|(a, _), (b, _)| a.key.cmp(&b.key)),
        GroupOrder::ValueDesc(series) => {
            let idx = table
                .series_index(series)
                .ok_or_else(|| AggregateError::UnknownSeries {
                    name: series.clone(),
                    available: table.series.clone(),
                })?;
            rows.sort_by(|(a, _), (b, _)| {
                b.values[idx]
                    .total_cmp(&a.values[idx])
                    .then_with(|| a.key.cmp(&b.key))
            });
        }
    }

    table.rows = rows.into_iter().map(|(row, _)| row).collect();
    if let Some(limit) = spec.limit {
        table.rows.truncate(limit);
    }
    Ok(())
}

/// Groups `rows` by `spec.by` and evaluates each measure per bucket.
///
/// Rows without a key are skipped. Category keys match case-insensitively,
/// like filters do, and a bucket shows the first spelling seen. An empty
/// selection yields an empty table that still names its series.
pub fn group_rows(
    dataset: &MappedDataset,
    rows: &[&MappedRow],
    spec: &GroupingSpec,
) -> Result<ChartTable> {
    let source = KeySource::resolve(dataset, spec.by)?;
    check_measures(dataset, &spec.measures)?;

    let series = spec.measures.iter().map(Measure::series_name).collect();
    let mut table = ChartTable::new(spec.resolved_title(), spec.by, series);

    let mut index: BTreeMap<String, usize> = BTreeMap::new();
    let mut buckets: Vec<Bucket> = Vec::new();

    for row in rows {
        let Some((key, start)) = source.key(dataset, row) else {
            continue;
        };
        let slot = *index.entry(key.to_ascii_lowercase()).or_insert_with(|| {
            buckets.push(Bucket::new(key, start, spec.measures.len()));
            buckets.len() - 1
        });
        let bucket = &mut buckets[slot];
        bucket.rows += 1;
        for (idx, measure) in spec.measures.iter().enumerate() {
            if let Some(value) = measure
                .field()
                .and_then(|field| dataset.get(row, field))
                .and_then(CellValue::as_number)
            {
                bucket.sums[idx] += value;
                bucket.counts[idx] += 1;
            }
        }
    }

    order_rows(&mut buckets, &mut table, spec)?;
    Ok(table)
}
