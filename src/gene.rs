//! Gene symbol to PDB structure lookup.
//!
//! The table is fixed. Unknown symbols resolve to [`DEFAULT_PDB_ID`] so the
//! viewer always has a structure to show.

/// Known gene symbols (uppercase) and the PDB entry used for each.
pub const GENE_STRUCTURES: [(&str, &str); 5] = [
    // Tumor protein p53
    ("TP53", "1TUP"),
    // Breast cancer type 2
    ("BRCA2", "1MIU"),
    // Breast cancer type 1
    ("BRCA1", "1JNX"),
    // Hemochromatosis protein
    ("HFE", "1A6Z"),
    // LDL receptor
    ("LDLR", "1N7D"),
];

/// Fallback PDB entry for symbols missing from [`GENE_STRUCTURES`].
pub const DEFAULT_PDB_ID: &str = "1TUP";

/// Resolve a gene symbol to a PDB identifier.
///
/// Matching is case-insensitive. Surrounding whitespace is kept as-is, so
/// `" TP53"` is an unknown symbol and falls back to [`DEFAULT_PDB_ID`].
#[must_use]
pub fn resolve(gene_symbol: &str) -> &'static str {
    let key = gene_symbol.to_uppercase();
    GENE_STRUCTURES
        .iter()
        .find(|(symbol, _)| *symbol == key)
        .map_or(DEFAULT_PDB_ID, |&(_, pdb_id)| pdb_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_symbols_any_case() {
        for (symbol, pdb_id) in GENE_STRUCTURES {
            assert_eq!(resolve(symbol), pdb_id);
            assert_eq!(resolve(&symbol.to_lowercase()), pdb_id);
        }
        assert_eq!(resolve("Brca1"), "1JNX");
        assert_eq!(resolve("ldlr"), "1N7D");
    }

    #[test]
    fn unknown_symbols_fall_back() {
        assert_eq!(resolve("XYZ1"), DEFAULT_PDB_ID);
        assert_eq!(resolve(""), DEFAULT_PDB_ID);
        assert_eq!(resolve("Unknown"), DEFAULT_PDB_ID);
    }

    #[test]
    fn whitespace_is_not_trimmed() {
        assert_eq!(resolve(" HFE"), DEFAULT_PDB_ID);
        assert_eq!(resolve("HFE\n"), DEFAULT_PDB_ID);
    }

    #[test]
    fn default_is_a_table_entry() {
        assert!(GENE_STRUCTURES.iter().any(|(_, id)| *id == DEFAULT_PDB_ID));
    }

    #[test]
    fn resolving_twice_is_stable() {
        assert_eq!(resolve("brca2"), resolve("brca2"));
    }
}
