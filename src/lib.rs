// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Mutation-to-structure coordination layer.
//!
//! A variant file is scanned by an external service, the returned candidate
//! mutations are listed, and selecting one shows the protein structure for
//! its gene with the mutated residue highlighted.
//!
//! # Key entry points
//!
//! - [`gene::resolve`] - gene symbol to PDB id, with a fixed fallback
//! - [`selection::SelectionStore`] - scan results and the current selection
//! - [`engine::StructureSequencer`] - drives a [`engine::RenderSession`]
//!   through clear → load → represent → focus
//! - [`indicator::ProcessingIndicator`] - idle / processing / complete
//! - [`dashboard::Dashboard`] - one session wiring all of the above
//!
//! # Concurrency
//!
//! Everything runs on one thread. The scan request and structure downloads
//! run on worker threads and report back over channels that the session
//! loop drains without blocking in [`dashboard::Dashboard::tick`].

pub mod dashboard;
pub mod engine;
pub mod error;
pub mod gene;
pub mod indicator;
pub mod mutation;
pub mod options;
pub mod scan;
pub mod selection;

pub use dashboard::{Dashboard, Notice};
pub use error::MutaviewError;
pub use options::Options;
