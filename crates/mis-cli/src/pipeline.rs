//! Load, map, project and validate: the stages every subcommand shares.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use mis_ingest::{LoadOptions, load_dataset, sample_dataset};
use mis_map::{
    ColumnMapper, ColumnMapping, MappingDocument, MappingOutcome, MappingWarning, ProjectionCache,
};
use mis_model::{CanonicalField, MappedDataset, RawDataset, ValidationReport};
use mis_validate::validate_with;

use crate::config::AppConfig;

/// A `field=column` override; `field=none` unmaps the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOverride {
    pub field: CanonicalField,
    pub column: Option<String>,
}

impl FromStr for FieldOverride {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (field, column) = value
            .split_once('=')
            .ok_or_else(|| format!("expected FIELD=COLUMN or FIELD=none, got '{value}'"))?;
        let field = CanonicalField::from_str(field.trim()).map_err(|error| error.to_string())?;
        let column = column.trim();
        let column = if column.is_empty() || column.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(column.to_string())
        };
        Ok(Self { field, column })
    }
}

impl fmt::Display for FieldOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.field, self.column.as_deref().unwrap_or("none"))
    }
}

/// Where the source data and the mapping come from.
#[derive(Debug, Clone, Default)]
pub struct PipelineInput {
    /// `None` loads the bundled sample.
    pub file: Option<PathBuf>,
    pub sheet: Option<String>,
    pub mapping_file: Option<PathBuf>,
    pub overrides: Vec<FieldOverride>,
}

/// Output of the shared stages.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub raw: RawDataset,
    pub mapping: ColumnMapping,
    pub warnings: Vec<MappingWarning>,
    pub dataset: MappedDataset,
    pub report: ValidationReport,
}

pub fn load_source(file: Option<&Path>, sheet: Option<&str>) -> Result<RawDataset> {
    match file {
        Some(path) => {
            let options = LoadOptions {
                sheet: sheet.map(str::to_string),
            };
            load_dataset(path, &options).with_context(|| format!("load {}", path.display()))
        }
        None => {
            info!("no input file given, using the bundled sample");
            sample_dataset().context("load bundled sample")
        }
    }
}

/// Restores the saved mapping, applies overrides, then fills the rest.
///
/// Restored and overridden bindings are manual; every other field gets the
/// mapper's suggestion for the columns still free.
pub fn resolve_mapping(
    headers: &[String],
    mapper: &ColumnMapper,
    mapping_file: Option<&Path>,
    overrides: &[FieldOverride],
) -> Result<MappingOutcome> {
    let mut warnings = Vec::new();
    let mut mapping = ColumnMapping::new();

    if let Some(path) = mapping_file {
        let document = MappingDocument::load(path)
            .with_context(|| format!("load mapping {}", path.display()))?;
        let restored = document.restore(headers);
        mapping = restored.mapping;
        warnings.extend(restored.warnings);
    }
    for item in overrides {
        mapping
            .bind_column(item.field, item.column.as_deref(), headers)
            .with_context(|| format!("apply override {item}"))?;
    }

    let outcome = mapper.refresh(&mapping, headers);
    warnings.extend(outcome.warnings);
    for warning in &warnings {
        warn!(%warning, "mapping");
    }
    Ok(MappingOutcome {
        mapping: outcome.mapping,
        warnings,
    })
}

/// Runs the shared stages, reusing the last projection while the source
/// bytes, the mapping and the coercion options stay the same.
#[derive(Debug)]
pub struct Pipeline<'c> {
    config: &'c AppConfig,
    cache: ProjectionCache,
}

impl<'c> Pipeline<'c> {
    pub fn new(config: &'c AppConfig) -> Self {
        Self {
            config,
            cache: ProjectionCache::new(),
        }
    }

    pub fn cache(&self) -> &ProjectionCache {
        &self.cache
    }

    /// Runs load, mapping, projection and validation.
    pub fn prepare(&mut self, input: &PipelineInput) -> Result<Prepared> {
        let raw = {
            let _span = info_span!("load").entered();
            load_source(input.file.as_deref(), input.sheet.as_deref())?
        };

        let outcome = {
            let _span = info_span!("map", columns = raw.column_count()).entered();
            let mapper = ColumnMapper::new(self.config.matcher.clone());
            resolve_mapping(
                &raw.headers,
                &mapper,
                input.mapping_file.as_deref(),
                &input.overrides,
            )?
        };

        let dataset = {
            let _span = info_span!("project", rows = raw.row_count()).entered();
            self.cache
                .get_or_project(&raw, &outcome.mapping, &self.config.coercion)
                .clone()
        };

        let report = {
            let _span = info_span!("validate", rows = dataset.len()).entered();
            validate_with(
                &dataset,
                &self.config.validation,
                outcome.warnings.iter().map(MappingWarning::to_finding),
            )
        };

        Ok(Prepared {
            raw,
            mapping: outcome.mapping,
            warnings: outcome.warnings,
            dataset,
            report,
        })
    }
}

/// One-shot [`Pipeline::prepare`].
pub fn prepare(input: &PipelineInput, config: &AppConfig) -> Result<Prepared> {
    Pipeline::new(config).prepare(input)
}
