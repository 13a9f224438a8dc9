//! Transient presentation: camera focus, highlight and tooltip. Nothing here
//! touches the view-model.

use super::PocketSync;
use crate::engine::VisualizationEngine;
use crate::error::PocketViewError;

impl<E: VisualizationEngine> PocketSync<E> {
    /// Focus the camera on a pocket's cached atom selection.
    pub fn on_focus_pocket(&mut self, index: usize) -> Result<(), PocketViewError> {
        let (model, vm) = self.loaded_pocket(index)?;
        let query = vm.selection.atom_query.clone();
        let _guard = self.begin_batch();
        self.engine.focus(model, &query)?;
        Ok(())
    }

    /// Highlight a pocket and show its tooltip, or clear both.
    pub fn on_highlight_pocket(
        &mut self,
        index: usize,
        on: bool,
    ) -> Result<(), PocketViewError> {
        let (model, vm) = self.loaded_pocket(index)?;
        let query = vm.selection.atom_query.clone();
        let lines = if on {
            vec![
                vm.selection.label.clone(),
                format!("Pocket conservation: {}", vm.conservation_score),
            ]
        } else {
            Vec::new()
        };
        let _guard = self.begin_batch();
        self.engine.highlight(model, &query, on)?;
        self.engine.show_tooltip(&lines);
        Ok(())
    }
}
