//! Structure load and residue highlight sequencing.
//!
//! For every new `(reference_id, position)` pair the sequencer clears the
//! session, starts loading `rcsb://<reference_id>`, and, once the load
//! lands in [`poll`](StructureSequencer::poll), adds a chain-colored
//! cartoon followed by either a red ball-and-stick residue highlight with
//! a residue focus, or a whole-structure camera fit.
//!
//! Each request is stamped with a generation number. Loads are never
//! cancelled, but a new request drops every older pending load, and a
//! result whose generation is not the latest is discarded instead of being
//! drawn over the newer scene. A failed load moves the viewer to
//! [`ViewerStatus::Failed`].

use super::{CameraFit, RenderSession, Representation, SessionConfig};
use super::{residue_selection, PendingLoad};
use crate::error::MutaviewError;
use crate::options::ViewerOptions;
use crate::selection::SelectionStore;

/// What the viewer is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewerStatus {
    /// No structure requested yet.
    #[default]
    Empty,
    /// A load is in flight.
    Loading {
        /// PDB id being loaded.
        reference_id: String,
    },
    /// The latest requested structure is displayed.
    Rendered {
        /// PDB id on screen.
        reference_id: String,
        /// Highlighted residue, if any.
        position: Option<u32>,
    },
    /// The latest requested structure failed to load.
    Failed {
        /// PDB id that failed.
        reference_id: String,
        /// Failure description.
        message: String,
    },
    /// The session has been released.
    Unmounted,
}

/// A load waiting for its result.
struct InFlightLoad<T> {
    generation: u64,
    reference_id: String,
    position: Option<u32>,
    load: PendingLoad<T>,
}

/// Owns the rendering session and sequences loads against it.
pub struct StructureSequencer<S: RenderSession> {
    session: Option<S>,
    options: ViewerOptions,
    generation: u64,
    in_flight: Vec<InFlightLoad<S::Structure>>,
    status: ViewerStatus,
    observed: (String, Option<u32>),
}

impl<S: RenderSession> StructureSequencer<S> {
    /// Create the session once, with the configured background.
    ///
    /// # Errors
    ///
    /// Propagates whatever `create` returns.
    pub fn mount<F>(
        options: ViewerOptions,
        create: F,
    ) -> Result<Self, MutaviewError>
    where
        F: FnOnce(&SessionConfig) -> Result<S, MutaviewError>,
    {
        let session = create(&SessionConfig {
            background_color: options.background_color.clone(),
        })?;
        Ok(Self {
            session: Some(session),
            options,
            generation: 0,
            in_flight: Vec::new(),
            status: ViewerStatus::Empty,
            observed: (String::new(), None),
        })
    }

    /// Forward the store's derived fields if they changed since the last
    /// call.
    pub fn observe(&mut self, selection: &SelectionStore) {
        let reference_id = selection.reference_id();
        let position = selection.position();
        if self.observed.0 == reference_id && self.observed.1 == position {
            return;
        }
        self.observed = (reference_id.to_owned(), position);
        self.on_reference_or_position_changed(reference_id, position);
    }

    /// Start showing `reference_id`, highlighting `position` when given.
    ///
    /// Empty ids are ignored. Returns without waiting for the load.
    pub fn on_reference_or_position_changed(
        &mut self,
        reference_id: &str,
        position: Option<u32>,
    ) {
        if reference_id.is_empty() {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            log::debug!("viewer unmounted, ignoring {reference_id}");
            return;
        };

        session.remove_all_components();
        let uri = self.options.source_uri(reference_id);
        let load = session.load_file(&uri);

        self.generation += 1;
        log::info!(
            "loading {uri} (residue {position:?}, generation {})",
            self.generation
        );
        if !self.in_flight.is_empty() {
            log::debug!("dropping {} superseded loads", self.in_flight.len());
            self.in_flight.clear();
        }
        self.in_flight.push(InFlightLoad {
            generation: self.generation,
            reference_id: reference_id.to_owned(),
            position,
            load,
        });
        self.status = ViewerStatus::Loading {
            reference_id: reference_id.to_owned(),
        };
    }

    /// Apply any loads that have finished. Returns the new status when it
    /// changed.
    pub fn poll(&mut self) -> Option<&ViewerStatus> {
        if self.session.is_none() || self.in_flight.is_empty() {
            return None;
        }

        let mut changed = false;
        let mut i = 0;
        while i < self.in_flight.len() {
            let Some(result) = self.in_flight[i].load.try_take() else {
                i += 1;
                continue;
            };
            let done = self.in_flight.swap_remove(i);
            if done.generation != self.generation {
                log::debug!(
                    "discarding stale load of {} (generation {} < {})",
                    done.reference_id,
                    done.generation,
                    self.generation
                );
                continue;
            }
            changed = true;
            match result {
                Ok(structure) => self.present(structure, &done),
                Err(e) => {
                    log::warn!("failed to load {}: {e}", done.reference_id);
                    self.status = ViewerStatus::Failed {
                        reference_id: done.reference_id,
                        message: e.to_string(),
                    };
                }
            }
        }

        changed.then_some(&self.status)
    }

    /// Release the session. Loads still in flight are dropped and will
    /// never touch it.
    pub fn unmount(&mut self) {
        if self.session.take().is_some() {
            log::debug!("viewer unmounted");
        }
        self.in_flight.clear();
        self.status = ViewerStatus::Unmounted;
    }

    /// Current viewer status.
    #[must_use]
    pub fn status(&self) -> &ViewerStatus {
        &self.status
    }

    /// Whether the session is still alive.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.session.is_some()
    }

    /// Number of loads that have not resolved yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Read-only access to the session.
    #[must_use]
    pub fn session(&self) -> Option<&S> {
        self.session.as_ref()
    }

    /// Add the representations and camera move for a finished load.
    fn present(
        &mut self,
        structure: S::Structure,
        load: &InFlightLoad<S::Structure>,
    ) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let component = session.add_component(structure);
        session.add_representation(
            component,
            &Representation::cartoon_by_chain(),
        );

        // Residue 0 does not exist in 1-based numbering.
        match load.position.filter(|&p| p > 0) {
            Some(position) => {
                session.add_representation(
                    component,
                    &Representation::residue_highlight(
                        position,
                        &self.options.highlight_color,
                        self.options.highlight_radius,
                    ),
                );
                session.auto_view(
                    component,
                    &CameraFit::Residue {
                        selection: residue_selection(position),
                        duration_ms: self.options.focus_duration_ms,
                    },
                );
            }
            None => session.auto_view(component, &CameraFit::Whole),
        }

        log::info!(
            "rendered {} (residue {:?})",
            load.reference_id,
            load.position
        );
        self.status = ViewerStatus::Rendered {
            reference_id: load.reference_id.clone(),
            position: load.position,
        };
    }
}
