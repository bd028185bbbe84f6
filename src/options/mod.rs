//! Centralized session options with TOML file support.
//!
//! Scan endpoint, viewer session, and indicator timing settings live here.
//! Every section uses `#[serde(default)]` so a file that only overrides
//! `[viewer]` (or is empty) still loads.

mod indicator;
mod scan;
mod viewer;

use std::path::Path;

pub use indicator::IndicatorOptions;
pub use scan::ScanOptions;
pub use viewer::ViewerOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::MutaviewError;

/// Top-level options container.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Scan service settings.
    pub scan: ScanOptions,
    /// Viewer session settings.
    pub viewer: ViewerOptions,
    /// Processing indicator settings.
    pub indicator: IndicatorOptions,
}

impl Options {
    /// Generate JSON Schema describing the options file.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MutaviewError::Io`] if the file cannot be read and
    /// [`MutaviewError::OptionsParse`] if it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, MutaviewError> {
        let content =
            std::fs::read_to_string(path).map_err(MutaviewError::Io)?;
        toml::from_str(&content)
            .map_err(|e| MutaviewError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`MutaviewError::OptionsParse`] if serialization fails and
    /// [`MutaviewError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), MutaviewError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MutaviewError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(MutaviewError::Io)?;
        }
        std::fs::write(path, content).map_err(MutaviewError::Io)
    }
}
