//! Integration tests for the shared pipeline and terminal formatting.

use std::fs;
use std::path::PathBuf;

use mis_aggregate::compute_kpi_set;
use mis_cli::config::AppConfig;
use mis_cli::pipeline::{FieldOverride, Pipeline, PipelineInput, prepare};
use mis_cli::summary::{exclusion_line, fields_table, format_kpi, mapping_table};
use mis_map::{MappingDocument, MatcherConfig};
use mis_model::{CanonicalField, FilterSet};
use tempfile::TempDir;

const EXAMPLE: &str = "month,channel,orders,revenue,cost\n\
                       2024-01,web,10,1000,600\n\
                       2024-01,store,5,500,400\n";

fn example_file(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("example.csv");
    fs::write(&path, EXAMPLE).unwrap();
    path
}

#[test]
fn example_kpis_render_for_the_terminal() {
    let dir = TempDir::new().unwrap();
    let input = PipelineInput {
        file: Some(example_file(&dir)),
        ..PipelineInput::default()
    };
    let prepared = prepare(&input, &AppConfig::default()).unwrap();
    assert!(!prepared.report.has_errors());

    let (kpis, exclusions) =
        compute_kpi_set(&prepared.dataset, &prepared.report, &FilterSet::new()).unwrap();
    let text = kpis
        .iter()
        .map(|(kpi, value)| format!("{}: {}", kpi.label(), format_kpi(kpi, value)))
        .collect::<Vec<_>>()
        .join("\n");

    insta::assert_snapshot!(text, @r"
    Orders: 15
    GMV: 0
    Revenue: 1,500
    Cost: 1,000
    Units: 0
    Customers: 0
    Gross Margin: 500
    Margin %: 33.3%
    AOV: 100
    Rows: 2
    ");
    insta::assert_snapshot!(
        exclusion_line(&exclusions),
        @"Rows: 2 total, 2 included, 0 filtered out, 0 unparseable"
    );
}

#[test]
fn repeated_prepare_reuses_the_projection() {
    let dir = TempDir::new().unwrap();
    let input = PipelineInput {
        file: Some(example_file(&dir)),
        ..PipelineInput::default()
    };
    let config = AppConfig::default();
    let mut pipeline = Pipeline::new(&config);
    let first = pipeline.prepare(&input).unwrap();
    let second = pipeline.prepare(&input).unwrap();
    assert_eq!(first.dataset, second.dataset);
    assert_eq!((pipeline.cache().hits(), pipeline.cache().misses()), (1, 1));

    // A different mapping projects again.
    let remapped = PipelineInput {
        overrides: vec!["cost=none".parse::<FieldOverride>().unwrap()],
        ..input
    };
    let third = pipeline.prepare(&remapped).unwrap();
    assert!(!third.dataset.is_mapped(CanonicalField::Cost));
    assert_eq!(pipeline.cache().misses(), 2);
}

#[test]
fn overrides_are_saved_and_restored() {
    let dir = TempDir::new().unwrap();
    let input = PipelineInput {
        file: Some(example_file(&dir)),
        overrides: vec![
            "cost=none".parse::<FieldOverride>().unwrap(),
            "channel=Channel".parse::<FieldOverride>().unwrap(),
        ],
        ..PipelineInput::default()
    };
    let prepared = prepare(&input, &AppConfig::default()).unwrap();
    assert!(!prepared.mapping.is_mapped(CanonicalField::Cost));
    assert!(prepared.mapping.is_manual(CanonicalField::Cost));
    assert_eq!(prepared.mapping.source_for(CanonicalField::Channel), Some("channel"));

    let saved = dir.path().join("mapping.json");
    MappingDocument::from_mapping(&prepared.mapping)
        .save(&saved)
        .unwrap();

    let restored = prepare(
        &PipelineInput {
            file: input.file.clone(),
            mapping_file: Some(saved),
            ..PipelineInput::default()
        },
        &AppConfig::default(),
    )
    .unwrap();
    assert_eq!(restored.mapping.key(), prepared.mapping.key());
    assert!(!restored.mapping.is_mapped(CanonicalField::Cost));
    assert!(restored.warnings.is_empty());
}

#[test]
fn override_naming_a_missing_column_fails() {
    let dir = TempDir::new().unwrap();
    let input = PipelineInput {
        file: Some(example_file(&dir)),
        overrides: vec!["revenue=Net Sales".parse().unwrap()],
        ..PipelineInput::default()
    };
    let err = prepare(&input, &AppConfig::default()).unwrap_err();
    assert!(format!("{err:#}").contains("column 'Net Sales' not found"));
}

#[test]
fn missing_input_file_is_reported() {
    let input = PipelineInput {
        file: Some(PathBuf::from("no/such/export.csv")),
        ..PipelineInput::default()
    };
    let err = prepare(&input, &AppConfig::default()).unwrap_err();
    assert!(format!("{err:#}").contains("export.csv"));
}

#[test]
fn sample_is_used_without_a_file() {
    let prepared = prepare(&PipelineInput::default(), &AppConfig::default()).unwrap();
    assert_eq!(prepared.raw.row_count(), 48);
    assert!(prepared.report.findings.is_empty());

    let mut table = mapping_table(&prepared.mapping);
    table.force_no_tty();
    let rendered = table.to_string();
    assert!(rendered.contains("Net Sales"));
    assert!(rendered.contains("auto"));
}

#[test]
fn fields_table_lists_every_field() {
    let mut table = fields_table(&MatcherConfig::default());
    table.force_no_tty();
    let rendered = table.to_string();
    for field in CanonicalField::ALL {
        assert!(rendered.contains(field.as_str()), "{field} missing");
    }
    assert!(rendered.contains("numeric"));
    assert!(rendered.contains("temporal"));
}
