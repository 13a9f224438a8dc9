//! Pocket visualization synchronization.
//!
//! [`PocketSync`] owns the pocket view-model and is the only writer of
//! engine-visible state on the application side. Changes flow one way per
//! turn:
//!
//! - **App → engine**: a view-model operation (show only pocket 3, switch
//!   to cartoon) issues visibility and color commands, then publishes the
//!   new view-model in a single replacement.
//! - **Engine → app**: a visibility change made directly in the 3D view
//!   arrives as a [`NodeChanged`](crate::engine::NodeChanged) and is
//!   replayed through the same batch routine as an app-originated change.
//!
//! A [`ReentrancyFlag`] is held for every outgoing command batch so that
//! notifications caused by the core's own commands are ignored instead of
//! echoing back.

mod display;
mod load;
mod pockets;
mod presentation;
mod reentrancy;
mod view_model;

pub use reentrancy::{ReentrancyFlag, ReentrancyGuard};
pub use view_model::PocketViewModel;

use crate::color::BaselineSnapshot;
use crate::engine::{refs, EntityRef, ModelId, VisualizationEngine};
use crate::error::{LoadError, PocketViewError};
use crate::options::{Options, PocketsView};
use crate::prediction::{PocketDescriptor, PredictionId};
use crate::selection::SelectionCache;
use crate::visibility::PocketVisibility;

// ---------------------------------------------------------------------------
// Load state
// ---------------------------------------------------------------------------

/// Identifies one load request. Only the most recent ticket may publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    /// Monotonic generation of the request.
    #[must_use]
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Lifecycle of the current structure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A load is in flight.
    Loading(LoadTicket),
    /// The view-model is published.
    Ready,
    /// The last load failed; [`PocketSync::retry`] re-issues it.
    Failed(LoadError),
}

/// Per-load state, replaced wholesale on every successful load.
#[derive(Debug)]
struct Session {
    model: ModelId,
    cache: SelectionCache,
    baseline: BaselineSnapshot,
    predicted: bool,
}

// ---------------------------------------------------------------------------
// PocketSync
// ---------------------------------------------------------------------------

/// Keeps the pocket view-model and a [`VisualizationEngine`] consistent.
pub struct PocketSync<E> {
    engine: E,
    options: Options,
    reentrancy: ReentrancyFlag,
    state: LoadState,
    session: Option<Session>,
    pockets: Vec<PocketViewModel>,
    last_request: Option<PredictionId>,
    /// Monotonic load generation; the current ticket is `LoadTicket(load_generation)`.
    load_generation: u64,
    /// Bumped once per published view-model.
    revision: u64,
    /// Revision last consumed by the list widget.
    rendered_revision: u64,
}

impl<E: VisualizationEngine> PocketSync<E> {
    /// Wrap an engine. Nothing is loaded until
    /// [`load_structure`](Self::load_structure) or
    /// [`begin_load`](Self::begin_load) is called.
    #[must_use]
    pub fn new(engine: E, options: Options) -> Self {
        Self {
            engine,
            options,
            reentrancy: ReentrancyFlag::new(),
            state: LoadState::Idle,
            session: None,
            pockets: Vec::new(),
            last_request: None,
            load_generation: 0,
            revision: 0,
            rendered_revision: 0,
        }
    }

    // -- Accessors --

    /// Current pocket view-model, in rank order.
    #[must_use]
    pub fn pockets(&self) -> &[PocketViewModel] {
        &self.pockets
    }

    /// Load lifecycle state.
    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The engine being driven.
    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable engine access, for hosts that forward user input to it.
    /// Visibility changes made this way are picked up by
    /// [`pump_engine_events`](Self::pump_engine_events).
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Model of the published structure.
    #[must_use]
    pub fn model(&self) -> Option<ModelId> {
        self.session.as_ref().map(|s| s.model)
    }

    /// Whether the published structure is a predicted one.
    #[must_use]
    pub fn is_predicted(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.predicted)
    }

    /// Selection cache of the published structure.
    #[must_use]
    pub fn selection_cache(&self) -> Option<&SelectionCache> {
        self.session.as_ref().map(|s| &s.cache)
    }

    /// Handle on the re-entrancy flag, for hosts that dispatch their own
    /// engine commands and need to know whether the core is mid-batch.
    #[must_use]
    pub fn reentrancy_flag(&self) -> ReentrancyFlag {
        self.reentrancy.clone()
    }

    // -- Change tracking --

    /// Revision of the published view-model.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the view-model changed since [`mark_rendered`](Self::mark_rendered).
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.revision != self.rendered_revision
    }

    /// Mark the current view-model as rendered.
    pub fn mark_rendered(&mut self) {
        self.rendered_revision = self.revision;
    }

    // -- Internals --

    /// Replace the view-model in one step.
    fn publish(&mut self, pockets: Vec<PocketViewModel>) {
        self.pockets = pockets;
        self.revision += 1;
    }

    fn visibility_vector(&self) -> Vec<bool> {
        self.pockets.iter().map(|p| p.is_visible).collect()
    }

    fn check_index(&self, index: usize) -> Result<(), PocketViewError> {
        if index < self.pockets.len() {
            Ok(())
        } else {
            Err(PocketViewError::PocketIndexOutOfRange {
                index,
                len: self.pockets.len(),
            })
        }
    }

    /// Model and cached selection of a published pocket.
    fn loaded_pocket(
        &self,
        index: usize,
    ) -> Result<(ModelId, &PocketViewModel), PocketViewError> {
        let model = self.model().ok_or(PocketViewError::NotLoaded)?;
        self.check_index(index)?;
        Ok((model, &self.pockets[index]))
    }

    /// Open an outgoing command batch.
    ///
    /// Viewer changes still queued are reconciled first, so the queue is
    /// empty when the guard is taken and the drain at the end of the batch
    /// only sees notifications the batch caused.
    fn begin_batch(&mut self) -> ReentrancyGuard {
        let _ = self.pump_engine_events();
        self.reentrancy.enter()
    }

    /// Route queued notifications through the handler. Called at the end of
    /// every guarded batch, so they are all recognized as self-inflicted.
    fn discard_own_notifications(&mut self) {
        for event in self.engine.take_notifications() {
            self.on_engine_node_changed(&event);
        }
    }
}

// ---------------------------------------------------------------------------
// Command helpers
// ---------------------------------------------------------------------------

/// Resolve `reference` and set its visibility.
///
/// A missing optional entity is skipped silently; a missing required one is
/// logged. Either way only this one command is dropped.
fn set_entity_visibility<E: VisualizationEngine>(
    engine: &mut E,
    reference: &EntityRef,
    visible: bool,
    optional: bool,
) -> bool {
    let Some(node) = engine.resolve(reference) else {
        if !optional {
            log::error!("can't select {reference}");
        }
        return false;
    };
    match engine.set_visibility(node, visible) {
        Ok(()) => true,
        Err(e) => {
            log::error!("visibility of {reference}: {e}");
            false
        }
    }
}

/// Issue visibility for a pocket's root and both visuals.
///
/// The root is updated so other listeners on the pocket entity see the
/// change; visibility does not propagate to the visuals, so they are set
/// explicitly.
fn issue_pocket_visuals<E: VisualizationEngine>(
    engine: &mut E,
    pocket: &PocketDescriptor,
    is_visible: bool,
    view: PocketsView,
) {
    let projected = PocketVisibility::project(view, is_visible);
    let _ = set_entity_visibility(
        engine,
        &refs::pocket_root(pocket),
        is_visible,
        false,
    );
    let _ = set_entity_visibility(
        engine,
        &refs::pocket_atoms(pocket),
        projected.atoms,
        false,
    );
    let _ = set_entity_visibility(
        engine,
        &refs::pocket_surface(pocket),
        projected.surface,
        false,
    );
}
