//! Projection of display modes onto concrete scene entities.
//!
//! The polymer has six representations: atoms, surface and cartoon, each
//! in a full and a confident-region variant. Exactly one of them is shown at
//! a time. Each pocket has an atoms visual and a surface visual; at most one
//! is shown, and none while the pocket is hidden.

use crate::engine::refs;
use crate::options::{PocketsView, PolymerView};

/// Target visibility of the six polymer representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct PolymerVisibility {
    /// Full surface.
    pub surface: bool,
    /// Full cartoon.
    pub cartoon: bool,
    /// Full atoms.
    pub atoms: bool,
    /// Confident-region surface.
    pub confident_surface: bool,
    /// Confident-region cartoon.
    pub confident_cartoon: bool,
    /// Confident-region atoms.
    pub confident_atoms: bool,
}

/// One entity visibility target produced by a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityTarget {
    /// Scene reference.
    pub reference: &'static str,
    /// Target visibility.
    pub visible: bool,
    /// Whether the entity may legitimately be absent from the scene.
    pub optional: bool,
}

impl PolymerVisibility {
    /// Project a polymer view and the confident-only flag.
    #[must_use]
    pub fn project(view: PolymerView, show_confident_only: bool) -> Self {
        let surface = view == PolymerView::Surface;
        let cartoon = view == PolymerView::Cartoon;
        let atoms = view == PolymerView::Atoms;
        Self {
            surface: surface && !show_confident_only,
            cartoon: cartoon && !show_confident_only,
            atoms: atoms && !show_confident_only,
            confident_surface: surface && show_confident_only,
            confident_cartoon: cartoon && show_confident_only,
            confident_atoms: atoms && show_confident_only,
        }
    }

    /// All six targets. Every one is issued, not just the changed ones, so
    /// that state altered directly in the viewer is overwritten.
    #[must_use]
    pub fn targets(&self) -> [VisibilityTarget; 6] {
        let target = |reference, visible, optional| VisibilityTarget {
            reference,
            visible,
            optional,
        };
        [
            target(refs::POLYMER_SURFACE, self.surface, false),
            target(refs::POLYMER_CARTOON, self.cartoon, false),
            target(refs::POLYMER_ATOMS, self.atoms, false),
            target(refs::CONFIDENT_SURFACE, self.confident_surface, true),
            target(refs::CONFIDENT_CARTOON, self.confident_cartoon, true),
            target(refs::CONFIDENT_ATOMS, self.confident_atoms, true),
        ]
    }
}

/// Target visibility of one pocket's two visuals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PocketVisibility {
    /// Atoms visual.
    pub atoms: bool,
    /// Surface visual.
    pub surface: bool,
}

impl PocketVisibility {
    /// Project a pocket view for a pocket with the given visibility.
    #[must_use]
    pub fn project(view: PocketsView, is_visible: bool) -> Self {
        Self {
            atoms: is_visible && view == PocketsView::Atoms,
            surface: is_visible && view == PocketsView::Surface,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWS: [PolymerView; 3] =
        [PolymerView::Atoms, PolymerView::Surface, PolymerView::Cartoon];

    fn full(v: &PolymerVisibility) -> usize {
        [v.surface, v.cartoon, v.atoms].iter().filter(|&&b| b).count()
    }

    fn confident(v: &PolymerVisibility) -> usize {
        [v.confident_surface, v.confident_cartoon, v.confident_atoms]
            .iter()
            .filter(|&&b| b)
            .count()
    }

    #[test]
    fn exactly_one_representation_is_shown() {
        for view in VIEWS {
            let v = PolymerVisibility::project(view, false);
            assert_eq!((full(&v), confident(&v)), (1, 0), "{view:?}");
            let v = PolymerVisibility::project(view, true);
            assert_eq!((full(&v), confident(&v)), (0, 1), "{view:?}");
        }
    }

    #[test]
    fn projection_matches_view() {
        let v = PolymerVisibility::project(PolymerView::Cartoon, false);
        assert!(v.cartoon);
        let v = PolymerVisibility::project(PolymerView::Atoms, true);
        assert!(v.confident_atoms);
    }

    #[test]
    fn only_confident_targets_are_optional() {
        let targets = PolymerVisibility::default().targets();
        let optional: Vec<_> = targets
            .iter()
            .filter(|t| t.optional)
            .map(|t| t.reference)
            .collect();
        assert_eq!(
            optional,
            vec![
                refs::CONFIDENT_SURFACE,
                refs::CONFIDENT_CARTOON,
                refs::CONFIDENT_ATOMS
            ]
        );
    }

    #[test]
    fn hidden_pocket_shows_nothing() {
        for view in [PocketsView::Atoms, PocketsView::Surface] {
            assert_eq!(
                PocketVisibility::project(view, false),
                PocketVisibility::default()
            );
        }
        let v = PocketVisibility::project(PocketsView::Atoms, true);
        assert!(v.atoms && !v.surface);
        let v = PocketVisibility::project(PocketsView::Surface, true);
        assert!(v.surface && !v.atoms);
    }
}
