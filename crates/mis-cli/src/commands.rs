use anyhow::{Context, Result};
use tracing::{info, info_span};

use mis_aggregate::{
    AggregationRequest, GroupOrder, GroupingSpec, Measure, compute, rows_to_frame, sales_metric,
    select, write_csv,
};
use mis_cli::config::AppConfig;
use mis_cli::pipeline::prepare;
use mis_cli::summary::{fields_table, mapping_table, print_dashboard, print_report, print_warnings};
use mis_map::MappingDocument;
use mis_model::MappedDataset;

use crate::cli::{DashboardArgs, MapArgs, ValidateArgs};

/// What `main` turns into an exit code.
pub enum Outcome {
    Success,
    Failed,
}

pub fn run_fields(config: &AppConfig) -> Result<Outcome> {
    println!("{}", fields_table(&config.matcher));
    Ok(Outcome::Success)
}

pub fn run_map(args: &MapArgs, config: &AppConfig) -> Result<Outcome> {
    let prepared = prepare(&args.source.pipeline_input(), config)?;
    println!(
        "Source: {} ({} rows, {} columns)",
        prepared.raw.source,
        prepared.raw.row_count(),
        prepared.raw.column_count()
    );
    println!("{}", mapping_table(&prepared.mapping));
    print_warnings(&prepared.warnings);

    if let Some(path) = &args.save_mapping {
        MappingDocument::from_mapping(&prepared.mapping)
            .save(path)
            .with_context(|| format!("save mapping {}", path.display()))?;
        println!("Saved mapping to {}", path.display());
    }
    Ok(Outcome::Success)
}

pub fn run_validate(args: &ValidateArgs, config: &AppConfig) -> Result<Outcome> {
    let prepared = prepare(&args.source.pipeline_input(), config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&prepared.report)?);
    } else {
        print_report(&prepared.report);
    }
    Ok(if prepared.report.has_errors() {
        Outcome::Failed
    } else {
        Outcome::Success
    })
}

pub fn run_dashboard(args: &DashboardArgs, config: &AppConfig) -> Result<Outcome> {
    let prepared = prepare(&args.source.pipeline_input(), config)?;
    let filters = args.filters();
    let request = if args.group_by.is_empty() {
        AggregationRequest::dashboard_default(&prepared.dataset, filters)
    } else {
        let measures = parse_measures(&args.measures, &prepared.dataset)?;
        let groupings = args
            .group_by
            .iter()
            .map(|by| {
                let spec = GroupingSpec::new(*by, measures.clone());
                match (args.top, measures.first()) {
                    (Some(limit), Some(first)) => spec
                        .ordered(GroupOrder::ValueDesc(first.series_name()))
                        .limited(limit),
                    _ => spec,
                }
            })
            .collect();
        AggregationRequest::new(filters, groupings)
    };

    let dashboard = {
        let _span = info_span!("aggregate", charts = request.groupings.len()).entered();
        if prepared.report.has_errors() && !args.json {
            print_report(&prepared.report);
        }
        compute(&prepared.dataset, &prepared.report, &request)?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        print_warnings(&prepared.warnings);
        print_dashboard(&dashboard);
    }

    if let Some(path) = &args.export_csv {
        let selection = select(&prepared.dataset, &request.filters)?;
        let mut frame = rows_to_frame(&prepared.dataset, &selection.rows)?;
        write_csv(&mut frame, path)?;
        info!(path = %path.display(), rows = selection.rows.len(), "exported filtered rows");
        if !args.json {
            println!("Exported {} rows to {}", selection.rows.len(), path.display());
        }
    }
    Ok(Outcome::Success)
}

/// Parsed `--measure` values, defaulting to the sales metric total.
fn parse_measures(raw: &[String], dataset: &MappedDataset) -> Result<Vec<Measure>> {
    if raw.is_empty() {
        return Ok(vec![sales_metric(dataset).map_or(Measure::Count, Measure::Sum)]);
    }
    raw.iter()
        .map(|text| text.parse::<Measure>().map_err(anyhow::Error::from))
        .collect()
}
