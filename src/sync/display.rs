//! Display-mode changes: polymer and pocket representations, and the
//! baseline polymer coloring beneath pocket overlays.

use super::{issue_pocket_visuals, set_entity_visibility, PocketSync};
use crate::color::{layer_visible, pocket_color_index, BaselineSnapshot};
use crate::engine::{EntityRef, ModelId, VisualizationEngine};
use crate::error::PocketViewError;
use crate::options::{PocketsView, PolymerColor, PolymerView};
use crate::visibility::PolymerVisibility;

impl<E: VisualizationEngine> PocketSync<E> {
    /// Switch the polymer representation.
    pub fn set_polymer_view(&mut self, view: PolymerView) {
        self.options.display.polymer_view = view;
        self.project_polymer();
    }

    /// Restrict the polymer to its confidently predicted region.
    ///
    /// Structures without confidence data have no confident-region
    /// entities; the polymer is then hidden entirely.
    pub fn set_show_only_confident(&mut self, confident_only: bool) {
        self.options.display.show_only_confident = confident_only;
        self.project_polymer();
    }

    /// Switch the representation of visible pockets. Per-pocket visibility
    /// is unchanged.
    pub fn set_pockets_view(&mut self, view: PocketsView) {
        self.options.display.pockets_view = view;
        if self.session.is_none() {
            return;
        }
        {
            let _guard = self.begin_batch();
            for vm in &self.pockets {
                issue_pocket_visuals(
                    &mut self.engine,
                    &vm.pocket,
                    vm.is_visible,
                    view,
                );
            }
            self.discard_own_notifications();
        }
    }

    /// Change the baseline polymer coloring.
    ///
    /// The baseline snapshot is re-captured after the engine recolors, and
    /// the overlays of all visible pockets are layered back on top.
    pub fn set_polymer_color(
        &mut self,
        mode: PolymerColor,
    ) -> Result<(), PocketViewError> {
        self.options.display.polymer_color = mode;
        let Some(model) = self.model() else {
            return Ok(());
        };
        let _guard = self.begin_batch();
        let result = self.recolor_polymer(model, mode);
        self.discard_own_notifications();
        result
    }

    fn project_polymer(&mut self) {
        if self.session.is_none() {
            return;
        }
        let display = self.options.display;
        let projected = PolymerVisibility::project(
            display.polymer_view,
            display.show_only_confident,
        );
        log::debug!("polymer projection {projected:?}");
        {
            let _guard = self.begin_batch();
            for target in projected.targets() {
                let _ = set_entity_visibility(
                    &mut self.engine,
                    &EntityRef::from(target.reference),
                    target.visible,
                    target.optional,
                );
            }
            self.discard_own_notifications();
        }
    }

    fn recolor_polymer(
        &mut self,
        model: ModelId,
        mode: PolymerColor,
    ) -> Result<(), PocketViewError> {
        self.engine.color_polymer(model, mode)?;
        let Some(mapping) = self.engine.color_mapping(model) else {
            log::warn!("color mapping unavailable, pocket overlays skipped");
            return Ok(());
        };
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        session.baseline = BaselineSnapshot::capture(&mapping);

        let palette = self.options.colors.palette_size();
        let layered = layer_visible(
            &session.baseline,
            self.pockets.iter().enumerate().filter(|(_, vm)| vm.is_visible).map(
                |(i, vm)| (vm.selection.as_ref(), pocket_color_index(i, palette)),
            ),
        );
        self.engine.set_color_mapping(model, layered)?;
        Ok(())
    }
}
