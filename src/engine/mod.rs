//! Rendering-engine capability consumed by the viewer.
//!
//! The engine itself (structure parsing, drawing, camera control) lives
//! behind [`RenderSession`]. The [`StructureSequencer`] is the only code
//! that holds a session and drives it.
//!
//! Structure loads are asynchronous: [`RenderSession::load_file`] returns
//! a [`PendingLoad`] immediately, and the result arrives later over a
//! channel. Whoever completes the load holds the matching [`LoadReply`].

#[cfg(feature = "net")]
pub mod headless;
pub mod sequencer;

use std::fmt;
use std::sync::mpsc::{self, TryRecvError};

pub use sequencer::{StructureSequencer, ViewerStatus};

use crate::error::MutaviewError;

// ── Vocabulary ───────────────────────────────────────────────────────────

/// Handle to a structure that has been added to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(pub u32);

/// Visual style of a representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepresentationKind {
    /// Ribbon trace of the backbone.
    Cartoon,
    /// Atoms as spheres joined by bond sticks.
    BallAndStick,
}

impl RepresentationKind {
    /// Engine-facing name (`"cartoon"`, `"ball+stick"`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cartoon => "cartoon",
            Self::BallAndStick => "ball+stick",
        }
    }
}

/// How a representation is colored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorScheme {
    /// One color per chain.
    ChainId,
    /// A single named or hex color.
    Uniform(String),
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChainId => f.write_str("chainid"),
            Self::Uniform(color) => f.write_str(color),
        }
    }
}

/// A representation added to a loaded component.
#[derive(Debug, Clone, PartialEq)]
pub struct Representation {
    /// Drawing style.
    pub kind: RepresentationKind,
    /// Residue selection expression; `None` covers the whole structure.
    pub selection: Option<String>,
    /// Coloring.
    pub color: ColorScheme,
    /// Sphere/stick radius override.
    pub radius: Option<f32>,
}

impl Representation {
    /// Whole-structure cartoon colored by chain.
    #[must_use]
    pub fn cartoon_by_chain() -> Self {
        Self {
            kind: RepresentationKind::Cartoon,
            selection: None,
            color: ColorScheme::ChainId,
            radius: None,
        }
    }

    /// Ball-and-stick for exactly one residue.
    #[must_use]
    pub fn residue_highlight(position: u32, color: &str, radius: f32) -> Self {
        Self {
            kind: RepresentationKind::BallAndStick,
            selection: Some(residue_selection(position)),
            color: ColorScheme::Uniform(color.to_owned()),
            radius: Some(radius),
        }
    }
}

/// Camera target for [`RenderSession::auto_view`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraFit {
    /// Fit the whole component.
    Whole,
    /// Animate to a residue selection.
    Residue {
        /// Selection expression for the residue.
        selection: String,
        /// Animation length in milliseconds.
        duration_ms: u32,
    },
}

/// Selection expression addressing a single residue number.
#[must_use]
pub fn residue_selection(position: u32) -> String {
    position.to_string()
}

/// Parameters a session is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Background color of the viewport.
    pub background_color: String,
}

// ── Capability ───────────────────────────────────────────────────────────

/// One live rendering-engine session.
pub trait RenderSession {
    /// A loaded but not yet displayed structure.
    type Structure;

    /// Remove every component. Calling it on an empty session is a no-op.
    fn remove_all_components(&mut self);

    /// Start loading the structure at `source_uri`. Returns immediately.
    fn load_file(&mut self, source_uri: &str) -> PendingLoad<Self::Structure>;

    /// Add a loaded structure to the scene.
    fn add_component(&mut self, structure: Self::Structure) -> ComponentId;

    /// Add a representation to a component.
    fn add_representation(
        &mut self,
        component: ComponentId,
        representation: &Representation,
    );

    /// Move the camera to `fit`.
    fn auto_view(&mut self, component: ComponentId, fit: &CameraFit);
}

// ── Load channel ─────────────────────────────────────────────────────────

/// Create a connected [`LoadReply`] / [`PendingLoad`] pair.
#[must_use]
pub fn load_channel<T>() -> (LoadReply<T>, PendingLoad<T>) {
    let (tx, rx) = mpsc::channel();
    (LoadReply { tx }, PendingLoad { rx })
}

/// Sending half of a structure load.
#[derive(Debug)]
pub struct LoadReply<T> {
    tx: mpsc::Sender<Result<T, MutaviewError>>,
}

impl<T> LoadReply<T> {
    /// Deliver the load result. A receiver that has gone away is ignored.
    pub fn complete(self, result: Result<T, MutaviewError>) {
        let _ = self.tx.send(result);
    }
}

/// Receiving half of a structure load.
#[derive(Debug)]
pub struct PendingLoad<T> {
    rx: mpsc::Receiver<Result<T, MutaviewError>>,
}

impl<T> PendingLoad<T> {
    /// A load that has already finished.
    #[must_use]
    pub fn ready(result: Result<T, MutaviewError>) -> Self {
        let (reply, pending) = load_channel();
        reply.complete(result);
        pending
    }

    /// Non-blocking check for the result.
    ///
    /// A reply dropped without completing reads as a load failure.
    pub fn try_take(&self) -> Option<Result<T, MutaviewError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err(MutaviewError::StructureLoad(
                    "load abandoned before completing".into(),
                )))
            }
        }
    }
}
