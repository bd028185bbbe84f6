//! Variant file upload and scan submission.
//!
//! A file is validated when it is chosen ([`VcfUpload::select`]) and read
//! when it is submitted. Submission runs the blocking scan call on a
//! worker thread ([`ScanJob`]) whose result is picked up with a
//! non-blocking [`ScanJob::poll`].

#[cfg(feature = "net")]
mod http;

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, TryRecvError};
use std::sync::Arc;

#[cfg(feature = "net")]
pub use http::HttpScanService;

use crate::error::MutaviewError;
use crate::mutation::ScanResponse;

/// File extension (with dot) the scanner accepts.
pub const VCF_EXTENSION: &str = ".vcf";

/// A variant file that passed selection-time validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcfUpload {
    path: PathBuf,
    file_name: String,
}

impl VcfUpload {
    /// Accept `path` if its file name ends in `.vcf`.
    ///
    /// The name is sent in the upload's part header, so names containing
    /// a double quote or a line break are refused as well.
    ///
    /// # Errors
    ///
    /// Returns [`MutaviewError::InvalidUpload`] for any other file name.
    pub fn select(path: impl Into<PathBuf>) -> Result<Self, MutaviewError> {
        let path = path.into();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| n.ends_with(VCF_EXTENSION))
            .map(str::to_owned)
            .ok_or_else(|| {
                MutaviewError::InvalidUpload(format!(
                    "{} is not a {VCF_EXTENSION} file",
                    path.display()
                ))
            })?;
        if file_name.contains(['"', '\r', '\n']) {
            return Err(MutaviewError::InvalidUpload(format!(
                "{file_name:?} cannot be sent as an upload name"
            )));
        }
        Ok(Self { path, file_name })
    }

    /// Path on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name sent with the upload.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Read the file contents.
    ///
    /// # Errors
    ///
    /// Returns [`MutaviewError::Io`] if the file cannot be read.
    pub fn read(&self) -> Result<Vec<u8>, MutaviewError> {
        Ok(std::fs::read(&self.path)?)
    }
}

/// The external variant scanner.
pub trait ScanService: Send + Sync {
    /// Submit `upload` and wait for the scanner's response.
    ///
    /// # Errors
    ///
    /// Any transport, status, or decoding failure.
    fn scan(&self, upload: &VcfUpload) -> Result<ScanResponse, MutaviewError>;
}

/// One scan running on a worker thread.
#[derive(Debug)]
pub struct ScanJob {
    file_name: String,
    rx: mpsc::Receiver<Result<ScanResponse, MutaviewError>>,
}

impl ScanJob {
    /// Start scanning `upload` with `service`.
    ///
    /// # Errors
    ///
    /// Returns [`MutaviewError::ThreadSpawn`] if the worker cannot start.
    pub fn spawn(
        service: Arc<dyn ScanService>,
        upload: VcfUpload,
    ) -> Result<Self, MutaviewError> {
        let (tx, rx) = mpsc::channel();
        let file_name = upload.file_name().to_owned();
        log::info!("submitting {file_name} for scanning");

        let _handle = std::thread::Builder::new()
            .name("scan".into())
            .spawn(move || {
                let _ = tx.send(service.scan(&upload));
            })
            .map_err(MutaviewError::ThreadSpawn)?;

        Ok(Self { file_name, rx })
    }

    /// Non-blocking check for the scan result.
    pub fn poll(&self) -> Option<Result<ScanResponse, MutaviewError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(MutaviewError::Scan(
                format!("scan of {} ended without a response", self.file_name),
            ))),
        }
    }

    /// Name of the file being scanned.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}
