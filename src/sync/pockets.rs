//! Per-pocket visibility: the batch synchronization routine and everything
//! that feeds it.

use super::{issue_pocket_visuals, PocketSync};
use crate::color::{apply_pocket_overlay, pocket_color_index};
use crate::engine::{NodeChanged, VisualizationEngine};
use crate::error::PocketViewError;

impl<E: VisualizationEngine> PocketSync<E> {
    /// Show or hide one pocket. A no-op when `visible` is already the
    /// pocket's visibility.
    pub fn set_pocket_visibility(
        &mut self,
        index: usize,
        visible: bool,
    ) -> Result<(), PocketViewError> {
        let _ = self.loaded_pocket(index)?;
        let _ = self.pump_engine_events();
        let mut target = self.visibility_vector();
        target[index] = visible;
        self.synchronize_visibility(&target);
        Ok(())
    }

    /// Make every pocket visible.
    pub fn show_all_pockets(&mut self) {
        let _ = self.pump_engine_events();
        let target = vec![true; self.pockets.len()];
        self.synchronize_visibility(&target);
    }

    /// Make pocket `index` the only visible pocket.
    pub fn show_only_pocket(
        &mut self,
        index: usize,
    ) -> Result<(), PocketViewError> {
        let _ = self.loaded_pocket(index)?;
        let _ = self.pump_engine_events();
        let target: Vec<bool> =
            (0..self.pockets.len()).map(|i| i == index).collect();
        self.synchronize_visibility(&target);
        Ok(())
    }

    /// Handle a visibility change reported by the engine.
    ///
    /// Ignored while the core is issuing its own commands, and when the
    /// entity is not a pocket root or already has the reported visibility.
    /// Otherwise the change is replayed through the batch routine for that
    /// one pocket.
    pub fn on_engine_node_changed(&mut self, event: &NodeChanged) {
        if self.reentrancy.is_set() {
            return;
        }
        // Earlier viewer changes go first.
        let _ = self.pump_engine_events();
        let Some(index) = self
            .pockets
            .iter()
            .position(|p| p.name() == event.entity.as_str())
        else {
            return;
        };
        if self.pockets[index].is_visible == event.visible {
            return;
        }
        log::debug!(
            "{} {} in the viewer",
            event.entity,
            if event.visible { "shown" } else { "hidden" }
        );
        let mut target = self.visibility_vector();
        target[index] = event.visible;
        self.synchronize_visibility(&target);
    }

    /// Drain the engine's queued notifications through
    /// [`on_engine_node_changed`](Self::on_engine_node_changed). Returns the
    /// number of notifications drained.
    pub fn pump_engine_events(&mut self) -> usize {
        let events = self.engine.take_notifications();
        for event in &events {
            self.on_engine_node_changed(event);
        }
        events.len()
    }

    /// Bring the engine and the view-model to `target` visibility.
    ///
    /// Only indices whose visibility changes are touched. Commands for all of
    /// them are issued under the re-entrancy guard, then the view-model is
    /// replaced once. Callers pump queued viewer changes before computing
    /// `target`, so everything drained inside the guard is self-inflicted.
    fn synchronize_visibility(&mut self, target: &[bool]) {
        let changed: Vec<usize> = self
            .pockets
            .iter()
            .zip(target)
            .enumerate()
            .filter(|(_, (vm, &visible))| vm.is_visible != visible)
            .map(|(i, _)| i)
            .collect();
        if changed.is_empty() {
            return;
        }
        log::debug!("synchronizing {} pocket(s)", changed.len());

        {
            let _guard = self.reentrancy.enter();
            for &index in &changed {
                self.apply_pocket_change(index, target[index]);
            }
            self.discard_own_notifications();
        }

        let next = self
            .pockets
            .iter()
            .enumerate()
            .map(|(i, vm)| {
                if changed.contains(&i) {
                    vm.with_visibility(target[i])
                } else {
                    vm.clone()
                }
            })
            .collect();
        self.publish(next);
    }

    /// Visibility and color commands for one pocket. Failures are logged and
    /// never abort the batch.
    fn apply_pocket_change(&mut self, index: usize, visible: bool) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let vm = &self.pockets[index];
        issue_pocket_visuals(
            &mut self.engine,
            &vm.pocket,
            visible,
            self.options.display.pockets_view,
        );

        let color_index =
            pocket_color_index(index, self.options.colors.palette_size());
        match apply_pocket_overlay(
            &self.engine,
            session.model,
            &vm.selection,
            visible,
            color_index,
            &session.baseline,
        ) {
            Ok(mapping) => {
                if let Err(e) =
                    self.engine.set_color_mapping(session.model, mapping)
                {
                    log::error!("{}: color update failed: {e}", vm.name());
                }
            }
            Err(e) => log::warn!("{}: {e}, color update skipped", vm.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use crate::engine::{
        EngineCommand, EntityRef, HeadlessEngine, NodeChanged,
        VisualizationEngine,
    };
    use crate::error::PocketViewError;
    use crate::options::Options;
    use crate::sync::PocketSync;

    fn visible(sync: &PocketSync<HeadlessEngine>) -> Vec<bool> {
        sync.pockets().iter().map(|p| p.is_visible).collect()
    }

    fn notify(name: &str, visible: bool) -> NodeChanged {
        NodeChanged {
            entity: EntityRef::from(name),
            visible,
        }
    }

    #[test]
    fn show_only_isolates_each_pocket() {
        let mut sync = fixtures::loaded();
        for i in 0..3 {
            sync.show_only_pocket(i).unwrap();
            let expected: Vec<bool> = (0..3).map(|j| j == i).collect();
            assert_eq!(visible(&sync), expected);
            let engine = sync.engine();
            for (j, p) in sync.pockets().iter().enumerate() {
                let surface = format!("{}-surface-visual", p.name());
                assert_eq!(engine.is_visible(p.name()), Some(i == j));
                assert_eq!(engine.is_visible(&surface), Some(i == j));
            }
        }
    }

    #[test]
    fn show_all_after_isolation() {
        let mut sync = fixtures::loaded();
        sync.show_only_pocket(1).unwrap();
        sync.show_all_pockets();
        assert_eq!(visible(&sync), vec![true; 3]);
    }

    #[test]
    fn unchanged_visibility_issues_no_commands() {
        let mut sync = fixtures::loaded();
        let revision = sync.revision();
        sync.set_pocket_visibility(0, true).unwrap();
        sync.show_all_pockets();
        assert!(sync.engine().commands().is_empty());
        assert_eq!(sync.revision(), revision);
    }

    #[test]
    fn batch_touches_only_changed_pockets() {
        let mut sync = fixtures::loaded();
        sync.set_pocket_visibility(2, false).unwrap();
        sync.engine_mut().clear_commands();

        // pocket3 is already hidden, only pocket2 changes
        sync.show_only_pocket(0).unwrap();
        let touched: Vec<&str> = sync
            .engine()
            .commands()
            .iter()
            .filter_map(|c| match c {
                EngineCommand::SetVisibility { entity, .. } => {
                    Some(entity.as_str())
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            touched,
            ["pocket2", "pocket2-atoms-visual", "pocket2-surface-visual"]
        );
    }

    #[test]
    fn one_publication_per_batch() {
        let mut sync = fixtures::loaded();
        sync.mark_rendered();
        sync.show_only_pocket(0).unwrap();
        assert!(sync.is_dirty());
        assert_eq!(sync.revision(), 2);
        sync.mark_rendered();
        assert!(!sync.is_dirty());
    }

    #[test]
    fn hiding_restores_baseline_colors() {
        let mut sync = fixtures::loaded();
        let model = sync.model().unwrap();
        for _ in 0..3 {
            sync.set_pocket_visibility(2, false).unwrap();
            let mapping = sync.engine().color_mapping(model).unwrap();
            assert_eq!(mapping.atoms[1], 0);
            assert_eq!(mapping.residues[1], 0);
            sync.set_pocket_visibility(2, true).unwrap();
            let mapping = sync.engine().color_mapping(model).unwrap();
            assert_eq!(mapping.atoms[1], 3);
        }
    }

    #[test]
    fn own_notifications_are_ignored() {
        let mut sync = fixtures::loaded();
        let flag = sync.reentrancy_flag();
        let revision = sync.revision();
        {
            let _guard = flag.enter();
            sync.on_engine_node_changed(&notify("pocket1", false));
        }
        assert_eq!(sync.revision(), revision);
        assert!(sync.pockets()[0].is_visible);
    }

    #[test]
    fn matching_notification_is_a_no_op() {
        let mut sync = fixtures::loaded();
        let revision = sync.revision();
        sync.on_engine_node_changed(&notify("pocket2", true));
        sync.on_engine_node_changed(&notify("polymer-surface", false));
        assert_eq!(sync.revision(), revision);
        assert!(sync.engine().commands().is_empty());
    }

    #[test]
    fn viewer_change_updates_exactly_one_pocket() {
        let mut sync = fixtures::loaded();
        sync.engine_mut()
            .user_set_visibility("pocket2", false)
            .unwrap();
        assert_eq!(sync.pump_engine_events(), 1);
        assert_eq!(visible(&sync), vec![true, false, true]);
        assert_eq!(
            sync.engine().is_visible("pocket2-surface-visual"),
            Some(false)
        );
        let model = sync.model().unwrap();
        let mapping = sync.engine().color_mapping(model).unwrap();
        assert_eq!(mapping.atoms[3], 0);
        assert_eq!(sync.pump_engine_events(), 0);
    }

    #[test]
    fn failed_command_does_not_abort_the_batch() {
        let mut sync = fixtures::loaded();
        sync.engine_mut().reject_commands_for("pocket2");
        sync.show_only_pocket(0).unwrap();
        assert_eq!(visible(&sync), vec![true, false, false]);
        let engine = sync.engine();
        assert_eq!(engine.is_visible("pocket2"), Some(true));
        assert_eq!(engine.is_visible("pocket2-surface-visual"), Some(false));
        assert_eq!(engine.is_visible("pocket3"), Some(false));
    }

    #[test]
    fn missing_mapping_skips_color_only() {
        let mut sync = fixtures::loaded();
        sync.engine_mut().disable_color_mapping();
        sync.set_pocket_visibility(0, false).unwrap();
        assert!(!sync.pockets()[0].is_visible);
        assert_eq!(
            sync.engine().is_visible("pocket1-surface-visual"),
            Some(false)
        );
        assert!(!sync
            .engine()
            .commands()
            .iter()
            .any(|c| matches!(c, EngineCommand::SetColorMapping { .. })));
    }

    #[test]
    fn index_and_load_errors() {
        let mut sync = fixtures::loaded();
        assert!(matches!(
            sync.set_pocket_visibility(7, false),
            Err(PocketViewError::PocketIndexOutOfRange { index: 7, len: 3 })
        ));

        let mut idle = PocketSync::new(HeadlessEngine::new(), Options::default());
        assert!(matches!(
            idle.show_only_pocket(0),
            Err(PocketViewError::NotLoaded)
        ));
        idle.show_all_pockets();
        assert!(idle.engine().commands().is_empty());
    }

    #[test]
    fn queued_viewer_change_survives_a_batch() {
        let mut sync = fixtures::loaded();
        sync.engine_mut()
            .user_set_visibility("pocket1", false)
            .unwrap();

        // not pumped yet when the next list action runs
        sync.set_pocket_visibility(2, false).unwrap();
        assert_eq!(visible(&sync), vec![false, true, false]);
        assert_eq!(sync.engine().is_visible("pocket1"), Some(false));
        assert_eq!(
            sync.engine().is_visible("pocket1-surface-visual"),
            Some(false)
        );
        assert_eq!(sync.pump_engine_events(), 0);
    }

    #[test]
    fn list_action_after_queued_viewer_change_wins() {
        let mut sync = fixtures::loaded();
        sync.engine_mut()
            .user_set_visibility("pocket2", false)
            .unwrap();
        sync.show_all_pockets();
        assert_eq!(visible(&sync), vec![true; 3]);
        assert_eq!(sync.engine().is_visible("pocket2"), Some(true));
        assert_eq!(
            sync.engine().is_visible("pocket2-surface-visual"),
            Some(true)
        );
    }

    #[test]
    fn direct_notification_keeps_other_queued_changes() {
        let mut sync = fixtures::loaded();
        sync.engine_mut()
            .user_set_visibility("pocket3", false)
            .unwrap();

        sync.on_engine_node_changed(&notify("pocket1", false));
        assert_eq!(visible(&sync), vec![false, true, false]);
        assert_eq!(sync.engine().is_visible("pocket3"), Some(false));
        assert_eq!(sync.pump_engine_events(), 0);
    }
}
