//! Scan service wire types.
//!
//! Only `gene` and `position` are read by the coordination layer. Every
//! other field the scanner sends is kept in [`Mutation::extra`] and written
//! back out unchanged.

use serde::{Deserialize, Serialize};

/// One candidate mutation returned by the variant scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mutation {
    /// Gene symbol, compared case-insensitively.
    #[serde(default)]
    pub gene: String,
    /// 1-based residue index of the substitution, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    /// Fields the coordination layer does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Mutation {
    /// Create a record with only the interpreted fields set.
    #[must_use]
    pub fn new(gene: impl Into<String>, position: Option<u32>) -> Self {
        Self {
            gene: gene.into(),
            position,
            extra: serde_json::Map::new(),
        }
    }

    /// Human-readable label: the scanner's protein change string
    /// (e.g. `p.Arg175His`) when present, otherwise `GENE:position`.
    #[must_use]
    pub fn label(&self) -> String {
        if let Some(change) =
            self.extra.get("mutation").and_then(serde_json::Value::as_str)
        {
            return format!("{} {change}", self.gene);
        }
        match self.position {
            Some(pos) => format!("{}:{pos}", self.gene),
            None => self.gene.clone(),
        }
    }

    /// Pathogenicity probability reported by the scanner, if any.
    #[must_use]
    pub fn probability(&self) -> Option<f64> {
        self.extra
            .get("probability")
            .and_then(serde_json::Value::as_f64)
    }
}

/// Body of a successful scan response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanResponse {
    /// Scanner status string (`"success"` on the happy path).
    pub status: String,
    /// Number of results the scanner reports.
    pub count: usize,
    /// Candidate mutations, in scanner order.
    pub results: Vec<Mutation>,
}
