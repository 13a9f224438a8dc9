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
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
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

//! Keeps a pocket list and a 3D molecular viewer consistent.
//!
//! A binding-site prediction names a set of pockets over a protein
//! structure. The viewer shows the structure and every pocket; the pocket
//! list lets the user show, hide, isolate, focus and highlight pockets. Both
//! sides can change pocket visibility, and this crate keeps them in step
//! without feedback loops.
//!
//! # Key entry points
//!
//! - [`sync::PocketSync`] - the synchronization core and owner of the pocket
//!   view-model
//! - [`engine::VisualizationEngine`] - the viewer capabilities the core
//!   drives, with [`engine::HeadlessEngine`] as an in-memory implementation
//! - [`prediction::PredictionLoader`] - where prediction data comes from
//! - [`options::Options`] - display modes, pocket palette and aggregation
//!   policy, with TOML presets
//!
//! # Architecture
//!
//! Loading fetches a prediction, builds the scene, applies the baseline
//! polymer coloring and snapshots it, averages per-residue scores per
//! pocket, and caches one selection per pocket. Afterwards every visibility
//! change goes through one batch routine that issues visibility commands
//! (via [`visibility`]) and color overlays (via [`color`]) under a
//! re-entrancy guard, then publishes the new view-model in one step.

pub mod color;
pub mod conservation;
pub mod engine;
pub mod error;
pub mod options;
pub mod prediction;
pub mod selection;
pub mod sync;
pub mod visibility;
