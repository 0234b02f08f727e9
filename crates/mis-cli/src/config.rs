//! `mis.toml`: matcher, validation and coercion settings.
//!
//! ```toml
//! [matcher]
//! fuzzy_threshold = 0.9
//!
//! [matcher.synonyms]
//! revenue = ["net sales", "net revenue"]
//!
//! [validation]
//! null_rate_threshold = 0.25
//!
//! [coercion]
//! date_formats = ["%d/%m/%Y"]
//! ```
//!
//! Absent tables and keys fall back to the library defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use mis_ingest::CoercionOptions;
use mis_map::MatcherConfig;
use mis_validate::ValidationOptions;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub matcher: MatcherConfig,
    pub validation: ValidationOptions,
    pub coercion: CoercionOptions,
}

impl AppConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config = Self::from_toml(&text).with_context(|| path.display().to_string())?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// The file at `path`, or defaults when none is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}
