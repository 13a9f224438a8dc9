//! Structure loading for PocketSync.
//!
//! Loading is a linear chain: fetch → build scene → baseline color →
//! snapshot → aggregate scores → cache selections → publish. Hosts with an
//! asynchronous fetch call [`PocketSync::begin_load`] and later
//! [`PocketSync::complete_load`] with the fetched payload; a completion that
//! arrives after a newer load started is discarded.

use std::rc::Rc;

use super::{
    issue_pocket_visuals, set_entity_visibility, LoadState, LoadTicket,
    PocketSync, PocketViewModel, Session,
};
use crate::color::{self, pocket_color_index, BaselineSnapshot};
use crate::conservation::compute_averages;
use crate::engine::{EngineError, EntityRef, VisualizationEngine};
use crate::error::{LoadError, PocketViewError};
use crate::prediction::{PredictionData, PredictionId, PredictionLoader};
use crate::selection::SelectionCache;
use crate::visibility::PolymerVisibility;

#[allow(clippy::needless_pass_by_value)]
fn engine_error(e: EngineError) -> LoadError {
    LoadError::Engine(e.to_string())
}

impl<E: VisualizationEngine> PocketSync<E> {
    /// Fetch `id` with `loader` and publish its pockets.
    ///
    /// On failure the state becomes [`LoadState::Failed`], an empty
    /// view-model is published and [`retry`](Self::retry) re-issues the
    /// request.
    pub fn load_structure<L: PredictionLoader + ?Sized>(
        &mut self,
        loader: &mut L,
        id: PredictionId,
    ) -> Result<&[PocketViewModel], PocketViewError> {
        let ticket = self.begin_load(id.clone());
        let fetched = loader.fetch(&id);
        self.complete_load(ticket, fetched)
    }

    /// Re-issue the last load request.
    pub fn retry<L: PredictionLoader + ?Sized>(
        &mut self,
        loader: &mut L,
    ) -> Result<&[PocketViewModel], PocketViewError> {
        let id = self.last_request.clone().ok_or(PocketViewError::NotLoaded)?;
        log::info!("retrying load of {}/{}", id.database, id.id);
        self.load_structure(loader, id)
    }

    /// Start a load. Any load still in flight is superseded.
    pub fn begin_load(&mut self, id: PredictionId) -> LoadTicket {
        self.load_generation += 1;
        let ticket = LoadTicket(self.load_generation);
        if let LoadState::Loading(previous) = self.state {
            log::debug!(
                "load {} superseded by load {}",
                previous.generation(),
                ticket.generation()
            );
        }
        log::info!("loading prediction {}/{}", id.database, id.id);
        self.state = LoadState::Loading(ticket);
        self.last_request = Some(id);
        ticket
    }

    /// Finish the load started with `ticket`.
    ///
    /// Returns [`LoadError::Superseded`] without touching any state when
    /// `ticket` is not the load in flight.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        fetched: Result<PredictionData, LoadError>,
    ) -> Result<&[PocketViewModel], PocketViewError> {
        let current = LoadTicket(self.load_generation);
        if self.state != LoadState::Loading(ticket) {
            log::debug!(
                "discarding stale load {} (current {})",
                ticket.generation(),
                current.generation()
            );
            return Err(LoadError::Superseded { ticket, current }.into());
        }

        let built = {
            let _guard = self.begin_batch();
            let built = fetched.and_then(|data| self.build_session(&data));
            self.discard_own_notifications();
            built
        };

        match built {
            Ok((session, pockets)) => {
                log::info!(
                    "published {} pockets for model {}",
                    pockets.len(),
                    session.model.0
                );
                self.session = Some(session);
                self.publish(pockets);
                self.state = LoadState::Ready;
                Ok(&self.pockets)
            }
            Err(e) => {
                log::error!("can't load data: {e}");
                // no half-built or previous scene outlives the session
                self.engine.clear();
                self.session = None;
                self.publish(Vec::new());
                self.state = LoadState::Failed(e.clone());
                Err(e.into())
            }
        }
    }

    /// Build the scene and the view-model. Must run inside a guarded batch.
    fn build_session(
        &mut self,
        data: &PredictionData,
    ) -> Result<(Session, Vec<PocketViewModel>), LoadError> {
        self.engine.clear();
        let model = self.engine.load_structure(data).map_err(engine_error)?;
        self.engine
            .build_pockets(model, &data.pockets)
            .map_err(engine_error)?;

        let predicted = data.is_predicted();
        let plddt = data.structure.scores.plddt.as_deref();
        if let Some(plddt) = plddt.filter(|s| predicted && !s.is_empty()) {
            if let Err(e) = self.engine.build_confident_region(model, plddt) {
                log::warn!("confident region unavailable: {e}");
            }
        }

        let display = self.options.display;
        self.engine
            .color_polymer(model, display.polymer_color)
            .map_err(engine_error)?;
        if self.engine.model() != Some(model) {
            return Err(LoadError::ModelUnavailable);
        }
        let baseline = BaselineSnapshot::capture(
            &self
                .engine
                .color_mapping(model)
                .ok_or(LoadError::MappingUnavailable)?,
        );

        let policy = self.options.conservation.missing_residue;
        let indices = &data.structure.indices;
        let conservation = compute_averages(
            &data.pockets,
            indices,
            data.structure.scores.conservation.as_deref(),
            policy,
        );
        let confidence = compute_averages(&data.pockets, indices, plddt, policy);

        let mut cache = SelectionCache::new();
        let mut pockets = Vec::with_capacity(data.pockets.len());
        for ((pocket, conservation_score), plddt_score) in
            data.pockets.iter().zip(conservation).zip(confidence)
        {
            let selection = cache
                .get_or_compute(&self.engine, model, pocket)
                .map_err(engine_error)?;
            pockets.push(PocketViewModel {
                pocket: Rc::new(pocket.clone()),
                conservation_score,
                plddt_score,
                is_visible: true,
                selection,
            });
        }

        let polymer = PolymerVisibility::project(
            display.polymer_view,
            display.show_only_confident,
        );
        for target in polymer.targets() {
            let _ = set_entity_visibility(
                &mut self.engine,
                &EntityRef::from(target.reference),
                target.visible,
                target.optional,
            );
        }
        for vm in &pockets {
            issue_pocket_visuals(
                &mut self.engine,
                &vm.pocket,
                true,
                display.pockets_view,
            );
        }

        let palette = self.options.colors.palette_size();
        let layered = color::layer_visible(
            &baseline,
            pockets.iter().enumerate().map(|(i, vm)| {
                (vm.selection.as_ref(), pocket_color_index(i, palette))
            }),
        );
        self.engine
            .set_color_mapping(model, layered)
            .map_err(engine_error)?;

        Ok((
            Session {
                model,
                cache,
                baseline,
                predicted,
            },
            pockets,
        ))
    }
}
