//! Shared selection state between the mutation list and the viewer.
//!
//! One [`SelectionStore`] is built per session and handed by reference to
//! whoever needs it. The derived fields are recomputed inside [`select`]
//! before it returns, so a reader never sees a PDB id or residue position
//! that disagrees with the selected mutation.
//!
//! [`select`]: SelectionStore::select

use crate::gene;
use crate::mutation::Mutation;

/// Scan results plus the currently selected mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionStore {
    results: Vec<Mutation>,
    selected: Option<Mutation>,
    reference_id: String,
    position: Option<u32>,
}

impl SelectionStore {
    /// Create an empty store (no results, nothing selected).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the results wholesale and drop any prior selection.
    pub fn set_results(&mut self, results: Vec<Mutation>) {
        log::debug!("selection: {} new results", results.len());
        self.results = results;
        self.selected = None;
        self.reference_id.clear();
        self.position = None;
    }

    /// Select a mutation and recompute the PDB id and residue position.
    ///
    /// Callers pass a member of [`results`](Self::results); this is not
    /// checked.
    pub fn select(&mut self, mutation: Mutation) {
        self.reference_id = gene::resolve(&mutation.gene).to_owned();
        self.position = mutation.position;
        log::info!(
            "selected {} -> {} (residue {:?})",
            mutation.label(),
            self.reference_id,
            self.position
        );
        self.selected = Some(mutation);
    }

    /// Select the result at `index`. Returns `false` (and leaves the
    /// selection untouched) when `index` is out of range.
    pub fn select_index(&mut self, index: usize) -> bool {
        let Some(mutation) = self.results.get(index).cloned() else {
            return false;
        };
        self.select(mutation);
        true
    }

    /// Current scan results, in scanner order.
    #[must_use]
    pub fn results(&self) -> &[Mutation] {
        &self.results
    }

    /// The selected mutation, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&Mutation> {
        self.selected.as_ref()
    }

    /// PDB id for the selected gene, or `""` when nothing is selected.
    #[must_use]
    pub fn reference_id(&self) -> &str {
        &self.reference_id
    }

    /// Residue position of the selected mutation.
    #[must_use]
    pub fn position(&self) -> Option<u32> {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan() -> Vec<Mutation> {
        vec![
            Mutation::new("TP53", Some(175)),
            Mutation::new("XYZ1", Some(10)),
            Mutation::new("brca1", None),
        ]
    }

    #[test]
    fn empty_store() {
        let store = SelectionStore::new();
        assert!(store.results().is_empty());
        assert!(store.selected().is_none());
        assert_eq!(store.reference_id(), "");
        assert_eq!(store.position(), None);
    }

    #[test]
    fn select_derives_reference_and_position() {
        let mut store = SelectionStore::new();
        store.set_results(scan());

        assert!(store.select_index(0));
        assert_eq!(store.reference_id(), "1TUP");
        assert_eq!(store.position(), Some(175));

        assert!(store.select_index(1));
        assert_eq!(store.reference_id(), gene::DEFAULT_PDB_ID);
        assert_eq!(store.position(), Some(10));
        assert_eq!(store.selected().map(|m| m.gene.as_str()), Some("XYZ1"));
    }

    #[test]
    fn select_without_position() {
        let mut store = SelectionStore::new();
        store.set_results(scan());
        assert!(store.select_index(0));
        assert!(store.select_index(2));
        assert_eq!(store.reference_id(), "1JNX");
        assert_eq!(store.position(), None);
    }

    #[test]
    fn set_results_clears_selection() {
        let mut store = SelectionStore::new();
        store.set_results(scan());
        assert!(store.select_index(0));

        store.set_results(vec![Mutation::new("HFE", Some(282))]);
        assert_eq!(store.results().len(), 1);
        assert!(store.selected().is_none());
        assert_eq!(store.reference_id(), "");
        assert_eq!(store.position(), None);

        // Repeated on an already-clear store.
        store.set_results(Vec::new());
        assert!(store.selected().is_none());
        assert_eq!(store.reference_id(), "");
    }

    #[test]
    fn out_of_range_index_keeps_selection() {
        let mut store = SelectionStore::new();
        store.set_results(scan());
        assert!(store.select_index(0));
        assert!(!store.select_index(9));
        assert_eq!(store.reference_id(), "1TUP");
        assert_eq!(store.position(), Some(175));
    }

    #[test]
    fn select_by_value() {
        let mut store = SelectionStore::new();
        let results = scan();
        store.set_results(results.clone());
        store.select(results[1].clone());
        assert_eq!(store.selected(), Some(&results[1]));
        assert_eq!(store.reference_id(), gene::resolve("XYZ1"));
    }
}
