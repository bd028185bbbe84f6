//! Crate-level error types.

use std::fmt;

/// Errors produced by the mutaview crate.
#[derive(Debug)]
pub enum MutaviewError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// The chosen file is not an acceptable variant file.
    InvalidUpload(String),
    /// The scan request failed or returned an unreadable body.
    Scan(String),
    /// Failed to load a molecular structure.
    StructureLoad(String),
    /// Failed to spawn a background thread.
    ThreadSpawn(std::io::Error),
    /// The viewer session could not be created or is gone.
    Viewer(String),
}

impl fmt::Display for MutaviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::InvalidUpload(msg) => write!(f, "invalid upload: {msg}"),
            Self::Scan(msg) => write!(f, "scan error: {msg}"),
            Self::StructureLoad(msg) => {
                write!(f, "structure load error: {msg}")
            }
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for MutaviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MutaviewError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
