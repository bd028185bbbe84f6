use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where and how variant files are submitted for scanning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Scan", inline)]
#[serde(default)]
pub struct ScanOptions {
    /// URL of the scan endpoint (multipart POST).
    #[schemars(title = "Endpoint")]
    pub endpoint: String,
    /// Multipart form field carrying the file.
    #[schemars(title = "Form Field")]
    pub file_field: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/scan-vcf".into(),
            file_field: "file".into(),
        }
    }
}
