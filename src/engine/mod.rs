//! Interface to the 3D visualization engine.
//!
//! The engine owns the scene graph, the query language and rendering. This
//! crate never renders anything itself; it drives an engine through the
//! [`VisualizationEngine`] trait and reconciles the engine's change
//! notifications with its own pocket view-model.
//!
//! [`HeadlessEngine`] is an in-memory implementation used by the
//! command-line driver and by tests.

mod headless;
pub mod refs;

use std::fmt;

pub use headless::HeadlessEngine;

use crate::color::ColorAssignment;
use crate::options::PolymerColor;
use crate::prediction::{PocketDescriptor, PredictionData};

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Stable handle to a structural model loaded into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub u64);

/// Engine-internal id of a resolved scene entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// Stable reference string naming a scene entity.
///
/// References are resolved to zero or one entity with
/// [`VisualizationEngine::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityRef(String);

impl EntityRef {
    /// Wrap a reference string.
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// The reference string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityRef {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Queries, notifications and commands
// ---------------------------------------------------------------------------

/// A spatial query over a model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectionQuery {
    /// Atoms with the given serial ids.
    AtomsById(Vec<u32>),
    /// All atoms of the residues with the given identifiers.
    ResiduesById(Vec<String>),
}

/// Emitted by the engine whenever an entity's visibility changes, no matter
/// who caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeChanged {
    /// Reference of the entity that changed.
    pub entity: EntityRef,
    /// Visibility reported after the change.
    pub visible: bool,
}

/// A command as observed by the engine. Engines that record their traffic
/// (such as [`HeadlessEngine`]) expose a log of these.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    /// Show or hide one entity.
    SetVisibility {
        /// Target entity.
        entity: EntityRef,
        /// Requested visibility.
        visible: bool,
    },
    /// Replace a model's color mapping and repaint.
    SetColorMapping {
        /// Target model.
        model: ModelId,
    },
    /// Recolor a model's polymer baseline.
    ColorPolymer {
        /// Target model.
        model: ModelId,
        /// Baseline mode.
        mode: PolymerColor,
    },
    /// Move the camera onto a query.
    Focus {
        /// Target model.
        model: ModelId,
        /// Query to frame.
        query: SelectionQuery,
    },
    /// Toggle a transient highlight.
    Highlight {
        /// Target model.
        model: ModelId,
        /// Query to highlight.
        query: SelectionQuery,
        /// Highlight on or off.
        on: bool,
    },
    /// Show tooltip lines; empty hides the tooltip.
    Tooltip(Vec<String>),
}

/// Errors reported by an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No entity matches the reference.
    EntityNotFound(EntityRef),
    /// No model with the given handle.
    ModelNotFound(ModelId),
    /// The engine refused the command.
    Rejected(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntityNotFound(r) => write!(f, "can't select {r}"),
            Self::ModelNotFound(m) => write!(f, "model {} not found", m.0),
            Self::Rejected(msg) => write!(f, "command rejected: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

// ---------------------------------------------------------------------------
// VisualizationEngine
// ---------------------------------------------------------------------------

/// Capabilities the synchronization core needs from a 3D engine.
///
/// All methods are called from a single logical thread. Implementations
/// queue a [`NodeChanged`] for every visibility change and hand them out
/// through [`take_notifications`](Self::take_notifications).
pub trait VisualizationEngine {
    /// Drop every entity and model. Called before a new structure is built.
    fn clear(&mut self);

    /// Load the structure and its polymer representations (atoms, surface,
    /// cartoon), returning a stable model handle.
    fn load_structure(
        &mut self,
        prediction: &PredictionData,
    ) -> Result<ModelId, EngineError>;

    /// Build the pocket group: one root entity per pocket (referenced by the
    /// pocket name) with an atoms visual and a surface visual beneath it.
    fn build_pockets(
        &mut self,
        model: ModelId,
        pockets: &[PocketDescriptor],
    ) -> Result<(), EngineError>;

    /// Build the confident-region polymer representations from per-residue
    /// confidence scores.
    fn build_confident_region(
        &mut self,
        model: ModelId,
        plddt: &[f64],
    ) -> Result<(), EngineError>;

    /// The structural model currently in the scene, if any.
    fn model(&self) -> Option<ModelId>;

    /// Atom indices selected by `query`.
    fn query_atoms(
        &self,
        model: ModelId,
        query: &SelectionQuery,
    ) -> Result<Vec<usize>, EngineError>;

    /// Residue indices touched by `query`.
    fn query_residues(
        &self,
        model: ModelId,
        query: &SelectionQuery,
    ) -> Result<Vec<usize>, EngineError>;

    /// Human-readable label for an atom-index selection.
    fn selection_label(
        &self,
        model: ModelId,
        atoms: &[usize],
    ) -> Result<String, EngineError>;

    /// Resolve a reference to zero or one entity.
    fn resolve(&self, entity: &EntityRef) -> Option<NodeId>;

    /// Show or hide a resolved entity.
    fn set_visibility(
        &mut self,
        node: NodeId,
        visible: bool,
    ) -> Result<(), EngineError>;

    /// Apply baseline polymer coloring for `mode`.
    fn color_polymer(
        &mut self,
        model: ModelId,
        mode: PolymerColor,
    ) -> Result<(), EngineError>;

    /// Current color mapping for `model`, or `None` if the model has not
    /// been colored yet.
    fn color_mapping(&self, model: ModelId) -> Option<ColorAssignment>;

    /// Replace the color mapping for `model` and repaint.
    fn set_color_mapping(
        &mut self,
        model: ModelId,
        mapping: ColorAssignment,
    ) -> Result<(), EngineError>;

    /// Move the camera onto `query`.
    fn focus(
        &mut self,
        model: ModelId,
        query: &SelectionQuery,
    ) -> Result<(), EngineError>;

    /// Toggle a transient highlight of `query`.
    fn highlight(
        &mut self,
        model: ModelId,
        query: &SelectionQuery,
        on: bool,
    ) -> Result<(), EngineError>;

    /// Show tooltip lines; an empty slice hides the tooltip.
    fn show_tooltip(&mut self, lines: &[String]);

    /// Drain queued visibility notifications, oldest first.
    fn take_notifications(&mut self) -> Vec<NodeChanged>;
}
