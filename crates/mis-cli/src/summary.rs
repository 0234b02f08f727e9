use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use mis_aggregate::Dashboard;
use mis_map::{ColumnMapping, MappingWarning, MatcherConfig};
use mis_model::{
    CanonicalField, ChartTable, ExclusionSummary, Finding, Kpi, KpiSet, Severity, ValidationReport,
};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_report_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

/// Amount with thousands separators and at most two decimals.
pub fn format_amount(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let sign = if rounded < 0.0 { "-" } else { "" };
    let magnitude = rounded.abs();
    let whole = format!("{:.0}", magnitude.trunc());
    let cents = ((magnitude - magnitude.trunc()) * 100.0).round();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, digit) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if cents == 0.0 {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{cents:02.0}")
    }
}

pub fn format_kpi(kpi: Kpi, value: f64) -> String {
    if kpi.is_ratio() {
        format!("{:.1}%", value * 100.0)
    } else {
        format_amount(value)
    }
}

pub fn exclusion_line(summary: &ExclusionSummary) -> String {
    let mut line = format!(
        "Rows: {} total, {} included, {} filtered out, {} unparseable",
        summary.total_rows, summary.included_rows, summary.filtered_rows, summary.unparseable_rows
    );
    if !summary.unparseable_by_field.is_empty() {
        let fields: Vec<String> = summary
            .unparseable_by_field
            .iter()
            .map(|(field, count)| format!("{field}: {count}"))
            .collect();
        line.push_str(&format!(" ({})", fields.join(", ")));
    }
    line
}

pub fn fields_table(config: &MatcherConfig) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Kind"),
        header_cell("Synonyms"),
    ]);
    apply_table_style(&mut table);
    for field in CanonicalField::ALL {
        let synonyms = config.synonyms_for(field);
        table.add_row(vec![
            Cell::new(field.as_str())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(field.kind().as_str()),
            if synonyms.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(synonyms.join(", "))
            },
        ]);
    }
    table
}

pub fn mapping_table(mapping: &ColumnMapping) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Column"),
        header_cell("Origin"),
        header_cell("Match"),
    ]);
    apply_table_style(&mut table);
    for field in CanonicalField::ALL {
        let binding = mapping.binding(field);
        let column = match binding.and_then(|b| b.source.as_deref()) {
            Some(source) => Cell::new(source),
            None => dim_cell("(unmapped)"),
        };
        let origin = match binding {
            Some(b) if b.is_manual() => Cell::new("manual").fg(Color::Magenta),
            Some(_) => Cell::new("auto"),
            None => dim_cell("-"),
        };
        let tier = match binding.and_then(|b| b.tier) {
            Some(tier) => Cell::new(tier.as_str()),
            None => dim_cell("-"),
        };
        table.add_row(vec![Cell::new(field.as_str()), column, origin, tier]);
    }
    table
}

pub fn print_warnings(warnings: &[MappingWarning]) {
    if warnings.is_empty() {
        return;
    }
    println!();
    println!("Mapping warnings:");
    for warning in warnings {
        println!("- {warning}");
    }
}

pub fn report_table(report: &ValidationReport) -> Table {
    let mut findings: Vec<&Finding> = report.findings.iter().collect();
    findings.sort_by_key(|f| (severity_rank(f.severity), f.check.as_str(), f.field));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Check"),
        header_cell("Field"),
        header_cell("Count"),
        header_cell("Message"),
    ]);
    apply_report_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Right);
    for finding in findings {
        table.add_row(vec![
            severity_cell(finding.severity),
            Cell::new(finding.check.as_str()),
            finding
                .field
                .map_or_else(|| dim_cell("-"), |field| Cell::new(field.as_str())),
            Cell::new(finding.count),
            Cell::new(&finding.message),
        ]);
    }
    table
}

pub fn print_report(report: &ValidationReport) {
    println!(
        "Validation: {} rows, {} errors, {} warnings",
        report.row_count,
        report.error_count(),
        report.warning_count()
    );
    if !report.findings.is_empty() {
        println!("{}", report_table(report));
    }
}

pub fn kpi_table(kpis: &KpiSet) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("KPI"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (kpi, value) in kpis.iter() {
        table.add_row(vec![Cell::new(kpi.label()), Cell::new(format_kpi(kpi, value))]);
    }
    table
}

pub fn chart_table(chart: &ChartTable) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell(chart.group_by.label())];
    header.extend(chart.series.iter().map(|series| header_cell(series)));
    table.set_header(header);
    apply_table_style(&mut table);
    for idx in 1..=chart.series.len() {
        align_column(&mut table, idx, CellAlignment::Right);
    }
    for row in &chart.rows {
        let mut cells = vec![Cell::new(&row.key)];
        cells.extend(row.values.iter().map(|value| Cell::new(format_amount(*value))));
        table.add_row(cells);
    }
    table
}

pub fn print_dashboard(dashboard: &Dashboard) {
    println!("{}", exclusion_line(&dashboard.exclusions));
    println!("{}", kpi_table(&dashboard.kpis));
    for chart in &dashboard.charts {
        println!();
        println!("{}", chart.title);
        if chart.is_empty() {
            println!("(no rows)");
        } else {
            println!("{}", chart_table(chart));
        }
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Error => 0,
        Severity::Warning => 1,
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_group_thousands() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.0), "999");
        assert_eq!(format_amount(1500.0), "1,500");
        assert_eq!(format_amount(1_234_567.891), "1,234,567.89");
        assert_eq!(format_amount(-2500.5), "-2,500.50");
    }

    #[test]
    fn ratios_render_as_percent() {
        assert_eq!(format_kpi(Kpi::Margin, 0.2), "20.0%");
        assert_eq!(format_kpi(Kpi::Aov, 100.0), "100");
    }
}
