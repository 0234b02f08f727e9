//! Per-kind cell coercion applied when a raw column is projected onto a
//! canonical field.
//!
//! A cell that cannot be coerced keeps its original text so the failure
//! stays visible to validation and aggregation.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use mis_model::{CanonicalField, CellValue, FieldKind, format_numeric};

const CURRENCY_SYMBOLS: [char; 5] = ['$', '€', '£', '₹', '¥'];

/// Date and month formats tried in order, as chrono format strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoercionOptions {
    pub date_formats: Vec<String>,
    pub month_formats: Vec<String>,
}

impl Default for CoercionOptions {
    fn default() -> Self {
        Self {
            date_formats: [
                "%Y-%m-%d",
                "%Y/%m/%d",
                "%m/%d/%Y",
                "%d.%m.%Y",
                "%Y%m%d",
                "%d %b %Y",
                "%b %d, %Y",
                "%Y-%m-%dT%H:%M:%S",
                "%Y-%m-%d %H:%M:%S",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            month_formats: ["%Y-%m", "%Y/%m", "%b %Y", "%B %Y", "%m/%Y"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Parses a numeric string.
///
/// Accepts thousands separators, one leading currency symbol and
/// accounting negatives such as `(1,200.50)`. Non-finite results are
/// rejected.
pub fn parse_number(raw: &str) -> Option<f64> {
    let mut text = raw.trim();
    let mut negative = false;
    if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        negative = true;
        text = inner.trim();
    }
    if let Some(rest) = text.strip_prefix('-')
        && rest.starts_with(CURRENCY_SYMBOLS)
    {
        negative = !negative;
        text = rest;
    }
    let text = text.trim_start_matches(CURRENCY_SYMBOLS).trim();
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Parses a calendar date using the configured formats.
pub fn parse_date(raw: &str, options: &CoercionOptions) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    options.date_formats.iter().find_map(|format| {
        if has_time_part(format) {
            NaiveDateTime::parse_from_str(text, format)
                .ok()
                .map(|dt| dt.date())
        } else {
            NaiveDate::parse_from_str(text, format).ok()
        }
    })
}

/// Parses a month, returning its first day.
pub fn parse_month(raw: &str, options: &CoercionOptions) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    // chrono cannot build a date without a day, so pin it to the first.
    let from_month = options.month_formats.iter().find_map(|format| {
        NaiveDate::parse_from_str(&format!("{text} 01"), &format!("{format} %d")).ok()
    });
    from_month
        .or_else(|| parse_date(text, options))
        .map(month_start)
}

/// Parses an ISO week (`2024-W03`, `2024W03`) or any date, returning the Monday.
pub fn parse_week(raw: &str, options: &CoercionOptions) -> Option<NaiveDate> {
    let text = raw.trim();
    parse_iso_week(text).or_else(|| parse_date(text, options).map(week_start))
}

fn parse_iso_week(text: &str) -> Option<NaiveDate> {
    let upper = text.to_ascii_uppercase();
    let (year, week) = upper.split_once('W')?;
    let year: i32 = year.trim_end_matches('-').parse().ok()?;
    let week: u32 = week.split('-').next()?.parse().ok()?;
    NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
}

fn has_time_part(format: &str) -> bool {
    format.contains("%H") || format.contains("%T")
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// ISO week start (Monday).
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Normalizes a date to the start of the bucket a temporal field denotes.
pub fn bucket_start(field: CanonicalField, date: NaiveDate) -> NaiveDate {
    match field {
        CanonicalField::Month => month_start(date),
        CanonicalField::Week => week_start(date),
        _ => date,
    }
}

/// Bucket key: `YYYY-MM-DD`, `YYYY-MM` or ISO `YYYY-Www`.
pub fn bucket_key(field: CanonicalField, date: NaiveDate) -> String {
    match field {
        CanonicalField::Month => date.format("%Y-%m").to_string(),
        CanonicalField::Week => {
            let iso = date.iso_week();
            format!("{}-W{:02}", iso.year(), iso.week())
        }
        _ => date.format("%Y-%m-%d").to_string(),
    }
}

/// Coerces one raw cell to the kind of `field`.
pub fn coerce_cell(cell: &CellValue, field: CanonicalField, options: &CoercionOptions) -> CellValue {
    match field.kind() {
        FieldKind::Numeric => coerce_numeric(cell),
        FieldKind::Temporal => coerce_temporal(cell, field, options),
        FieldKind::Categorical => match cell {
            CellValue::Missing => CellValue::Missing,
            other => CellValue::Text(other.render()),
        },
    }
}

fn coerce_numeric(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Number(value) if value.is_finite() => CellValue::Number(*value),
        CellValue::Number(value) => CellValue::Text(value.to_string()),
        CellValue::Text(text) => match parse_number(text) {
            Some(value) => CellValue::Number(value),
            None => CellValue::Text(text.clone()),
        },
        CellValue::Date(date) => CellValue::Text(date.format("%Y-%m-%d").to_string()),
        CellValue::Missing => CellValue::Missing,
    }
}

fn coerce_temporal(cell: &CellValue, field: CanonicalField, options: &CoercionOptions) -> CellValue {
    let parsed = match cell {
        CellValue::Missing => return CellValue::Missing,
        CellValue::Date(date) => Some(*date),
        CellValue::Text(text) => match field {
            CanonicalField::Month => parse_month(text, options),
            CanonicalField::Week => parse_week(text, options),
            _ => parse_date(text, options),
        },
        // Spreadsheet exports sometimes carry compact dates as numbers.
        CellValue::Number(value) => parse_date(&format_numeric(*value), options),
    };
    match parsed {
        Some(date) => CellValue::Date(bucket_start(field, date)),
        None => CellValue::Text(cell.render()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn numbers_accept_separators_and_currency() {
        assert_eq!(parse_number(" 1,234.50 "), Some(1234.5));
        assert_eq!(parse_number("$1,200"), Some(1200.0));
        assert_eq!(parse_number("₹ 99"), Some(99.0));
        assert_eq!(parse_number("(250)"), Some(-250.0));
        assert_eq!(parse_number("-€10"), Some(-10.0));
        assert_eq!(parse_number("-3.5"), Some(-3.5));
    }

    #[test]
    fn numbers_reject_garbage_and_non_finite() {
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("$"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn dates_try_each_format() {
        let options = CoercionOptions::default();
        assert_eq!(parse_date("2024-01-15", &options), Some(day(2024, 1, 15)));
        assert_eq!(parse_date("01/15/2024", &options), Some(day(2024, 1, 15)));
        assert_eq!(parse_date("15.01.2024", &options), Some(day(2024, 1, 15)));
        assert_eq!(parse_date("Jan 15, 2024", &options), Some(day(2024, 1, 15)));
        assert_eq!(
            parse_date("2024-01-15 08:30:00", &options),
            Some(day(2024, 1, 15))
        );
        assert_eq!(parse_date("someday", &options), None);
    }

    #[test]
    fn months_resolve_to_first_day() {
        let options = CoercionOptions::default();
        assert_eq!(parse_month("2024-01", &options), Some(day(2024, 1, 1)));
        assert_eq!(parse_month("Mar 2024", &options), Some(day(2024, 3, 1)));
        assert_eq!(parse_month("March 2024", &options), Some(day(2024, 3, 1)));
        assert_eq!(parse_month("2024-03-17", &options), Some(day(2024, 3, 1)));
        assert_eq!(parse_month("Q1", &options), None);
    }

    #[test]
    fn weeks_resolve_to_iso_monday() {
        let options = CoercionOptions::default();
        assert_eq!(parse_week("2024-W03", &options), Some(day(2024, 1, 15)));
        assert_eq!(parse_week("2024w03", &options), Some(day(2024, 1, 15)));
        assert_eq!(parse_week("2024-01-18", &options), Some(day(2024, 1, 15)));
        assert_eq!(parse_week("2024-W60", &options), None);
    }

    #[test]
    fn bucket_keys_follow_field() {
        let date = day(2024, 1, 3);
        assert_eq!(bucket_key(CanonicalField::Date, date), "2024-01-03");
        assert_eq!(bucket_key(CanonicalField::Month, date), "2024-01");
        assert_eq!(bucket_key(CanonicalField::Week, date), "2024-W01");
        // 2021-01-01 belongs to ISO week 53 of 2020.
        assert_eq!(bucket_key(CanonicalField::Week, day(2021, 1, 1)), "2020-W53");
    }

    #[test]
    fn failed_coercion_keeps_original_text() {
        let options = CoercionOptions::default();
        let cell = CellValue::Text("n/a".into());
        assert_eq!(
            coerce_cell(&cell, CanonicalField::Revenue, &options),
            CellValue::Text("n/a".into())
        );
        assert_eq!(
            coerce_cell(&cell, CanonicalField::Month, &options),
            CellValue::Text("n/a".into())
        );
    }

    #[test]
    fn temporal_cells_are_bucketed() {
        let options = CoercionOptions::default();
        let cell = CellValue::Date(day(2024, 1, 18));
        assert_eq!(
            coerce_cell(&cell, CanonicalField::Month, &options),
            CellValue::Date(day(2024, 1, 1))
        );
        assert_eq!(
            coerce_cell(&cell, CanonicalField::Week, &options),
            CellValue::Date(day(2024, 1, 15))
        );
        assert_eq!(
            coerce_cell(&CellValue::Number(20240118.0), CanonicalField::Date, &options),
            CellValue::Date(day(2024, 1, 18))
        );
    }

    #[test]
    fn categorical_cells_render_as_text() {
        let options = CoercionOptions::default();
        assert_eq!(
            coerce_cell(&CellValue::Number(42.0), CanonicalField::Product, &options),
            CellValue::Text("42".into())
        );
        assert_eq!(
            coerce_cell(&CellValue::Missing, CanonicalField::Product, &options),
            CellValue::Missing
        );
    }
}
