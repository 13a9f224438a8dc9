//! Per-atom and per-residue color-index layering.
//!
//! A [`ColorAssignment`] holds two parallel index arrays sized to the whole
//! structure. Index `0` ([`BASELINE`]) means "use the baseline theme"
//! (conservation, confidence or plain); index `n > 0` selects pocket palette
//! entry `n`.
//!
//! Pocket overlays are layered on top of a [`BaselineSnapshot`] taken once
//! per load, right after baseline coloring and before any overlay. Hiding a
//! pocket restores the entries it covers from that snapshot, never from the
//! engine's current arrays, which may already carry another pocket's
//! overlay. Overlapping visible pockets resolve last-write-wins.

use crate::engine::{ModelId, VisualizationEngine};
use crate::error::MappingUnavailable;
use crate::selection::SelectionEntry;

/// Color index meaning "baseline coloring".
pub const BASELINE: u32 = 0;

/// Palette color index for the pocket at `index` in rank order.
#[must_use]
pub fn pocket_color_index(index: usize, palette_size: usize) -> u32 {
    (index % palette_size.max(1)) as u32 + 1
}

/// Atom and residue color-index arrays for one model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorAssignment {
    /// Color index per atom.
    pub atoms: Vec<u32>,
    /// Color index per residue.
    pub residues: Vec<u32>,
}

impl ColorAssignment {
    /// All-baseline assignment of the given size.
    #[must_use]
    pub fn new(atom_count: usize, residue_count: usize) -> Self {
        Self {
            atoms: vec![BASELINE; atom_count],
            residues: vec![BASELINE; residue_count],
        }
    }

    /// Paint the pocket footprint with `color_index`.
    pub fn paint(&mut self, footprint: &SelectionEntry, color_index: u32) {
        for &atom in &footprint.atoms {
            if let Some(slot) = self.atoms.get_mut(atom) {
                *slot = color_index;
            }
        }
        for &residue in &footprint.residues {
            if let Some(slot) = self.residues.get_mut(residue) {
                *slot = color_index;
            }
        }
    }

    /// Restore the pocket footprint from `baseline`.
    pub fn restore(
        &mut self,
        footprint: &SelectionEntry,
        baseline: &BaselineSnapshot,
    ) {
        for &atom in &footprint.atoms {
            if let Some(slot) = self.atoms.get_mut(atom) {
                *slot = baseline.atom(atom);
            }
        }
        for &residue in &footprint.residues {
            if let Some(slot) = self.residues.get_mut(residue) {
                *slot = baseline.residue(residue);
            }
        }
    }
}

/// The color mapping in effect before any pocket overlay was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineSnapshot(ColorAssignment);

impl BaselineSnapshot {
    /// Capture a snapshot.
    #[must_use]
    pub fn capture(mapping: &ColorAssignment) -> Self {
        Self(mapping.clone())
    }

    /// Baseline index of `atom`.
    #[must_use]
    pub fn atom(&self, atom: usize) -> u32 {
        self.0.atoms.get(atom).copied().unwrap_or(BASELINE)
    }

    /// Baseline index of `residue`.
    #[must_use]
    pub fn residue(&self, residue: usize) -> u32 {
        self.0.residues.get(residue).copied().unwrap_or(BASELINE)
    }

    /// The captured mapping.
    #[must_use]
    pub fn mapping(&self) -> &ColorAssignment {
        &self.0
    }
}

/// Layer (or peel) one pocket's overlay onto the engine's current mapping.
///
/// Visible pockets paint their atoms and residues with `color_index`;
/// hidden pockets restore them from `baseline`. The returned mapping still
/// has to be pushed to the engine by the caller.
pub fn apply_pocket_overlay<E: VisualizationEngine + ?Sized>(
    engine: &E,
    model: ModelId,
    footprint: &SelectionEntry,
    visible: bool,
    color_index: u32,
    baseline: &BaselineSnapshot,
) -> Result<ColorAssignment, MappingUnavailable> {
    let mut mapping = engine
        .color_mapping(model)
        .ok_or(MappingUnavailable { model })?;
    if visible {
        mapping.paint(footprint, color_index);
    } else {
        mapping.restore(footprint, baseline);
    }
    Ok(mapping)
}

/// Rebuild a full mapping from `baseline` with the overlay of every visible
/// pocket applied in ascending index order.
pub fn layer_visible<'a>(
    baseline: &BaselineSnapshot,
    visible: impl IntoIterator<Item = (&'a SelectionEntry, u32)>,
) -> ColorAssignment {
    let mut mapping = baseline.mapping().clone();
    for (footprint, color_index) in visible {
        mapping.paint(footprint, color_index);
    }
    mapping
}
