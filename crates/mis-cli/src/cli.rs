//! CLI argument definitions for `mis`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use mis_cli::pipeline::{FieldOverride, PipelineInput};
use mis_model::{CanonicalField, FilterSet};

#[derive(Parser)]
#[command(
    name = "mis",
    version,
    about = "MIS dashboard - map, validate and summarize sales exports",
    long_about = "Map a CSV or spreadsheet export onto canonical sales fields,\n\
                  check its quality and print KPIs and grouped tables.\n\n\
                  Without an input file the bundled sample dataset is used."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// TOML file with [matcher], [validation] and [coercion] settings.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List canonical fields with their kinds and synonyms.
    Fields,

    /// Show the column mapping for a file.
    Map(MapArgs),

    /// Run the data quality checks; exits with 1 when any check fails.
    Validate(ValidateArgs),

    /// Print KPIs and chart tables.
    Dashboard(DashboardArgs),
}

#[derive(Args)]
pub struct SourceArgs {
    /// CSV or spreadsheet to read (default: bundled sample).
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Worksheet to read from a spreadsheet (default: first sheet).
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    /// Saved mapping document to restore.
    #[arg(long = "mapping", value_name = "PATH")]
    pub mapping: Option<PathBuf>,

    /// Bind a field by hand: FIELD=COLUMN, or FIELD=none to leave it unmapped.
    #[arg(long = "set", value_name = "FIELD=COLUMN")]
    pub overrides: Vec<FieldOverride>,
}

impl SourceArgs {
    pub fn pipeline_input(&self) -> PipelineInput {
        PipelineInput {
            file: self.file.clone(),
            sheet: self.sheet.clone(),
            mapping_file: self.mapping.clone(),
            overrides: self.overrides.clone(),
        }
    }
}

#[derive(Args)]
pub struct MapArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Write the resulting mapping document to this path.
    #[arg(long = "save-mapping", value_name = "PATH")]
    pub save_mapping: Option<PathBuf>,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the report as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct DashboardArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// First day to include (YYYY-MM-DD).
    #[arg(long = "from", value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD).
    #[arg(long = "to", value_name = "DATE")]
    pub to: Option<NaiveDate>,

    #[arg(long = "segment", value_name = "VALUE")]
    pub segments: Vec<String>,

    #[arg(long = "region", value_name = "VALUE")]
    pub regions: Vec<String>,

    #[arg(long = "channel", value_name = "VALUE")]
    pub channels: Vec<String>,

    #[arg(long = "product", value_name = "VALUE")]
    pub products: Vec<String>,

    /// Chart grouping field; repeat for several charts (default: the standard dashboard).
    #[arg(long = "group-by", value_name = "FIELD")]
    pub group_by: Vec<CanonicalField>,

    /// Measures for --group-by charts: sum(FIELD), mean(FIELD) or count.
    #[arg(long = "measure", value_name = "MEASURE")]
    pub measures: Vec<String>,

    /// Keep the N largest buckets of each --group-by chart.
    #[arg(long = "top", value_name = "N")]
    pub top: Option<usize>,

    /// Print the dashboard as JSON.
    #[arg(long = "json")]
    pub json: bool,

    /// Write the filtered rows as CSV.
    #[arg(long = "export-csv", value_name = "PATH")]
    pub export_csv: Option<PathBuf>,
}

impl DashboardArgs {
    pub fn filters(&self) -> FilterSet {
        FilterSet {
            from: self.from,
            to: self.to,
            segments: self.segments.iter().cloned().collect(),
            regions: self.regions.iter().cloned().collect(),
            channels: self.channels.iter().cloned().collect(),
            products: self.products.iter().cloned().collect(),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
