//! Column mapping for MIS data.
//!
//! Maps arbitrary source headers onto the canonical schema:
//!
//! - [`ColumnMapper`] suggests bindings (exact, contains, then fuzzy match)
//!   and refreshes them without touching manual choices
//! - [`ColumnMapping`] holds the bindings and records manual overrides
//! - [`MappingDocument`] saves and restores a mapping as JSON
//! - [`project`] applies a mapping to a raw dataset, coercing cells

mod document;
mod engine;
mod error;
mod mapping;
mod project;
mod synonyms;
pub mod utils;
mod warning;

pub use document::{MAPPING_DOCUMENT_VERSION, MappingDocument};
pub use engine::{ColumnMapper, MappingOutcome};
pub use error::{MapError, Result};
pub use mapping::{Binding, BindingOrigin, ColumnMapping, MatchTier};
pub use project::{ProjectionCache, project};
pub use synonyms::{DEFAULT_FUZZY_THRESHOLD, MatcherConfig, default_synonyms};
pub use warning::MappingWarning;
