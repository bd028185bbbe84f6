//! One user session: upload, mutation list, viewer, and indicator.
//!
//! The [`Dashboard`] owns exactly one [`SelectionStore`], one
//! [`StructureSequencer`], and one [`ProcessingIndicator`]. Every change to
//! the store is followed by [`StructureSequencer::observe`], so the viewer
//! sees the derived PDB id and residue only after the store has finished
//! updating them. Asynchronous completions (scan response, structure load)
//! are picked up in [`Dashboard::tick`].

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use web_time::Instant;

use crate::engine::{RenderSession, StructureSequencer, ViewerStatus};
use crate::error::MutaviewError;
use crate::indicator::ProcessingIndicator;
use crate::options::Options;
use crate::scan::{ScanJob, ScanService, VcfUpload};
use crate::selection::SelectionStore;

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The chosen file was rejected.
    InvalidUpload,
    /// The scan request failed; no results are shown.
    ScanFailed,
    /// The selected structure could not be loaded.
    StructureFailed {
        /// PDB id that failed.
        reference_id: String,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUpload => f.write_str("Please select a valid VCF file"),
            Self::ScanFailed => f.write_str("Upload failed. Please try again."),
            Self::StructureFailed { reference_id } => {
                write!(f, "Could not load structure {reference_id}")
            }
        }
    }
}

/// Session coordinator.
pub struct Dashboard<S: RenderSession> {
    scanner: Arc<dyn ScanService>,
    selection: SelectionStore,
    viewer: StructureSequencer<S>,
    indicator: ProcessingIndicator,
    upload: Option<VcfUpload>,
    scan: Option<ScanJob>,
    notices: Vec<Notice>,
}

impl<S: RenderSession> Dashboard<S> {
    /// Build a session around an already-mounted viewer.
    #[must_use]
    pub fn new(
        options: &Options,
        scanner: Arc<dyn ScanService>,
        viewer: StructureSequencer<S>,
    ) -> Self {
        Self {
            scanner,
            selection: SelectionStore::new(),
            viewer,
            indicator: ProcessingIndicator::new(options.indicator.delay()),
            upload: None,
            scan: None,
            notices: Vec::new(),
        }
    }

    /// Choose the file to upload. A rejected file clears any earlier
    /// choice and queues [`Notice::InvalidUpload`].
    pub fn choose_file(&mut self, path: impl Into<PathBuf>) -> bool {
        match VcfUpload::select(path) {
            Ok(upload) => {
                self.upload = Some(upload);
                true
            }
            Err(e) => {
                log::warn!("{e}");
                self.upload = None;
                self.notices.push(Notice::InvalidUpload);
                false
            }
        }
    }

    /// Submit the chosen file. Does nothing without a chosen file or
    /// while a scan is already running.
    ///
    /// # Errors
    ///
    /// Returns [`MutaviewError::ThreadSpawn`] if the scan worker cannot
    /// start.
    pub fn start_upload(&mut self, now: Instant) -> Result<bool, MutaviewError> {
        if self.scan.is_some() {
            return Ok(false);
        }
        let Some(upload) = self.upload.clone() else {
            return Ok(false);
        };
        self.scan = Some(ScanJob::spawn(Arc::clone(&self.scanner), upload)?);
        self.refresh_indicator(now);
        Ok(true)
    }

    /// Select the result at `index` and forward the new structure to the
    /// viewer. Returns `false` for an out-of-range index.
    pub fn select(&mut self, index: usize) -> bool {
        if !self.selection.select_index(index) {
            return false;
        }
        self.viewer.observe(&self.selection);
        true
    }

    /// Pick up finished scans and loads and advance the indicator.
    pub fn tick(&mut self, now: Instant) {
        if let Some(result) = self.scan.as_ref().and_then(ScanJob::poll) {
            self.scan = None;
            match result {
                Ok(response) => {
                    self.selection.set_results(response.results);
                    self.viewer.observe(&self.selection);
                }
                Err(e) => {
                    log::error!("Upload failed: {e}");
                    self.notices.push(Notice::ScanFailed);
                }
            }
        }

        self.refresh_indicator(now);
        if self.indicator.tick(now) {
            log::info!("indicator: {}", self.indicator.status_label());
        }

        if let Some(ViewerStatus::Failed { reference_id, .. }) =
            self.viewer.poll()
        {
            self.notices.push(Notice::StructureFailed {
                reference_id: reference_id.clone(),
            });
        }
    }

    /// Release the viewer and stop the indicator.
    pub fn teardown(&mut self) {
        self.viewer.unmount();
        self.indicator.reset();
        self.scan = None;
    }

    /// Drain queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Whether a scan is in flight.
    #[must_use]
    pub fn is_scanning(&self) -> bool {
        self.scan.is_some()
    }

    /// The shared selection state.
    #[must_use]
    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    /// The viewer.
    #[must_use]
    pub fn viewer(&self) -> &StructureSequencer<S> {
        &self.viewer
    }

    /// The processing indicator.
    #[must_use]
    pub fn indicator(&self) -> &ProcessingIndicator {
        &self.indicator
    }

    /// The indicator runs while a scan is in flight or results are shown.
    fn refresh_indicator(&mut self, now: Instant) {
        let active =
            self.scan.is_some() || !self.selection.results().is_empty();
        self.indicator.set_active(active, now);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::engine::{
        CameraFit, ComponentId, PendingLoad, Representation,
    };
    use crate::indicator::ProcessingState;
    use crate::mutation::{Mutation, ScanResponse};

    /// Scanner returning a fixed result list, or failing.
    struct FixedScan(Option<Vec<Mutation>>);

    impl ScanService for FixedScan {
        fn scan(
            &self,
            _upload: &VcfUpload,
        ) -> Result<ScanResponse, MutaviewError> {
            self.0.clone().map_or_else(
                || Err(MutaviewError::Scan("refused".into())),
                |results| {
                    Ok(ScanResponse {
                        status: "success".into(),
                        count: results.len(),
                        results,
                    })
                },
            )
        }
    }

    /// Session whose loads finish immediately; `1N7D` always fails.
    #[derive(Default)]
    struct InstantSession {
        loads: Vec<String>,
        views: Vec<CameraFit>,
    }

    impl RenderSession for InstantSession {
        type Structure = String;

        fn remove_all_components(&mut self) {}

        fn load_file(&mut self, source_uri: &str) -> PendingLoad<String> {
            self.loads.push(source_uri.to_owned());
            if source_uri.ends_with("1N7D") {
                PendingLoad::ready(Err(MutaviewError::StructureLoad(
                    "not found".into(),
                )))
            } else {
                PendingLoad::ready(Ok(source_uri.to_owned()))
            }
        }

        fn add_component(&mut self, _structure: String) -> ComponentId {
            ComponentId(0)
        }

        fn add_representation(&mut self, _: ComponentId, _: &Representation) {}

        fn auto_view(&mut self, _: ComponentId, fit: &CameraFit) {
            self.views.push(fit.clone());
        }
    }

    fn scan_results() -> Vec<Mutation> {
        vec![
            Mutation::new("TP53", Some(175)),
            Mutation::new("XYZ1", Some(10)),
            Mutation::new("LDLR", None),
        ]
    }

    fn dashboard(results: Option<Vec<Mutation>>) -> Dashboard<InstantSession> {
        let options = Options::default();
        let viewer = StructureSequencer::mount(options.viewer.clone(), |_| {
            Ok(InstantSession::default())
        })
        .unwrap();
        Dashboard::new(&options, Arc::new(FixedScan(results)), viewer)
    }

    fn vcf() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.vcf");
        std::fs::write(&path, "##fileformat=VCFv4.2\n").unwrap();
        (dir, path)
    }

    /// Tick until the scan job has reported.
    fn finish_scan(dash: &mut Dashboard<InstantSession>, now: Instant) {
        for _ in 0..400 {
            dash.tick(now);
            if !dash.is_scanning() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("scan never finished");
    }

    fn session(dash: &Dashboard<InstantSession>) -> &InstantSession {
        dash.viewer().session().unwrap()
    }

    #[test]
    fn rejected_file_is_not_uploaded() {
        let mut dash = dashboard(Some(scan_results()));
        assert!(!dash.choose_file("reads.bam"));
        assert_eq!(dash.take_notices(), vec![Notice::InvalidUpload]);
        assert!(!dash.start_upload(Instant::now()).unwrap());
        assert!(!dash.is_scanning());
    }

    #[test]
    fn upload_select_and_render() {
        let (_dir, path) = vcf();
        let t0 = Instant::now();
        let mut dash = dashboard(Some(scan_results()));

        assert!(dash.choose_file(&path));
        assert!(dash.start_upload(t0).unwrap());
        assert_eq!(dash.indicator().state(), ProcessingState::Processing);
        finish_scan(&mut dash, t0);
        assert_eq!(dash.selection().results().len(), 3);
        assert!(dash.viewer().session().unwrap().loads.is_empty());

        assert!(dash.select(0));
        assert_eq!(dash.selection().reference_id(), "1TUP");
        assert_eq!(dash.selection().position(), Some(175));
        dash.tick(t0);
        assert_eq!(
            dash.viewer().status(),
            &ViewerStatus::Rendered {
                reference_id: "1TUP".into(),
                position: Some(175),
            }
        );

        assert!(dash.select(1));
        assert_eq!(dash.selection().reference_id(), "1TUP");
        assert_eq!(dash.selection().position(), Some(10));
        dash.tick(t0);
        assert_eq!(session(&dash).loads, vec!["rcsb://1TUP", "rcsb://1TUP"]);

        assert!(!dash.select(7));
        assert!(dash.take_notices().is_empty());
    }

    #[test]
    fn no_position_fits_whole_structure() {
        let (_dir, path) = vcf();
        let t0 = Instant::now();
        let mut dash = dashboard(Some(scan_results()));
        assert!(dash.choose_file(&path));
        assert!(dash.start_upload(t0).unwrap());
        finish_scan(&mut dash, t0);

        assert!(dash.select(2));
        dash.tick(t0);
        // LDLR fails in this session; pick a gene that loads.
        assert_eq!(
            dash.take_notices(),
            vec![Notice::StructureFailed {
                reference_id: "1N7D".into()
            }]
        );

        dash.selection.set_results(vec![Mutation::new("HFE", None)]);
        assert!(dash.select(0));
        dash.tick(t0);
        assert_eq!(session(&dash).views.last(), Some(&CameraFit::Whole));
    }

    #[test]
    fn failed_scan_shows_notice_and_no_results() {
        let (_dir, path) = vcf();
        let t0 = Instant::now();
        let mut dash = dashboard(None);
        assert!(dash.choose_file(&path));
        assert!(dash.start_upload(t0).unwrap());
        finish_scan(&mut dash, t0);

        assert_eq!(dash.take_notices(), vec![Notice::ScanFailed]);
        assert!(dash.selection().results().is_empty());
        assert_eq!(dash.indicator().state(), ProcessingState::Idle);
    }

    #[test]
    fn indicator_completes_while_results_are_shown() {
        let (_dir, path) = vcf();
        let t0 = Instant::now();
        let mut dash = dashboard(Some(scan_results()));
        assert!(dash.choose_file(&path));
        assert!(dash.start_upload(t0).unwrap());
        finish_scan(&mut dash, t0);
        assert_eq!(dash.indicator().state(), ProcessingState::Processing);

        dash.tick(t0 + Duration::from_secs(3));
        assert_eq!(dash.indicator().state(), ProcessingState::Complete);
        assert_eq!(dash.indicator().status_label(), "Complete");
    }

    #[test]
    fn new_scan_clears_selection() {
        let (_dir, path) = vcf();
        let t0 = Instant::now();
        let mut dash = dashboard(Some(scan_results()));
        assert!(dash.choose_file(&path));
        assert!(dash.start_upload(t0).unwrap());
        finish_scan(&mut dash, t0);
        assert!(dash.select(0));

        assert!(dash.start_upload(t0).unwrap());
        finish_scan(&mut dash, t0);
        assert!(dash.selection().selected().is_none());
        assert_eq!(dash.selection().reference_id(), "");
        // The previous structure stays; nothing new is requested.
        assert_eq!(session(&dash).loads.len(), 1);
    }

    #[test]
    fn teardown_releases_viewer() {
        let mut dash = dashboard(Some(scan_results()));
        dash.teardown();
        assert!(!dash.viewer().is_mounted());
        assert_eq!(dash.indicator().state(), ProcessingState::Idle);
        dash.teardown();
    }
}
