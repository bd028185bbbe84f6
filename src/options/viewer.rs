use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Viewer session and residue highlight parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Viewer", inline)]
#[serde(default)]
pub struct ViewerOptions {
    /// Session background color.
    #[schemars(title = "Background")]
    pub background_color: String,
    /// Prefix joined with the PDB id to form the structure source URI.
    #[schemars(skip)]
    pub source_scheme: String,
    /// Base URL the headless session downloads `<ID>.cif` files from.
    #[schemars(title = "Download URL")]
    pub download_url: String,
    /// Local directory for downloaded structures. `None` disables caching.
    #[schemars(title = "Cache Directory")]
    pub cache_dir: Option<PathBuf>,
    /// Color of the highlighted residue.
    #[schemars(title = "Highlight Color")]
    pub highlight_color: String,
    /// Ball-and-stick radius of the highlighted residue.
    #[schemars(title = "Highlight Radius", range(min = 0.1, max = 3.0), extend("step" = 0.1))]
    pub highlight_radius: f32,
    /// Camera animation length when focusing a residue.
    #[schemars(title = "Focus Duration (ms)", range(min = 0, max = 5000))]
    pub focus_duration_ms: u32,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            background_color: "#1a1a1a".into(),
            source_scheme: "rcsb://".into(),
            download_url: "https://files.rcsb.org/download/".into(),
            cache_dir: None,
            highlight_color: "red".into(),
            highlight_radius: 1.0,
            focus_duration_ms: 1000,
        }
    }
}

impl ViewerOptions {
    /// Source URI for a PDB id (`rcsb://1TUP` with default options).
    #[must_use]
    pub fn source_uri(&self, reference_id: &str) -> String {
        format!("{}{reference_id}", self.source_scheme)
    }
}
