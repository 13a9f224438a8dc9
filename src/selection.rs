//! Memoized pocket selections.
//!
//! Evaluating a pocket's spatial query against a model is the expensive part
//! of every focus, highlight and recolor. The result only depends on the
//! (model, pocket) pair, so it is computed once and shared for the rest of
//! the load. A new load starts from an empty cache.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::engine::{EngineError, ModelId, SelectionQuery, VisualizationEngine};
use crate::prediction::PocketDescriptor;

/// Cached query plus the interactivity metadata derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEntry {
    /// Query over the pocket's surface atoms.
    pub atom_query: SelectionQuery,
    /// Query over the pocket's residues.
    pub residue_query: SelectionQuery,
    /// Atom indices selected by `atom_query`.
    pub atoms: Vec<usize>,
    /// Residue indices selected by `residue_query`.
    pub residues: Vec<usize>,
    /// Label shown when the pocket is highlighted.
    pub label: String,
}

type CacheKey = (ModelId, String);

/// Selection cache scoped to one structure load.
#[derive(Debug, Default)]
pub struct SelectionCache {
    entries: FxHashMap<CacheKey, Rc<SelectionEntry>>,
    misses: u64,
    hits: u64,
}

impl SelectionCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached entry for `(model, pocket)`, computing and storing it
    /// on first use.
    pub fn get_or_compute<E: VisualizationEngine + ?Sized>(
        &mut self,
        engine: &E,
        model: ModelId,
        pocket: &PocketDescriptor,
    ) -> Result<Rc<SelectionEntry>, EngineError> {
        let key = (model, pocket.name.clone());
        if let Some(entry) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(Rc::clone(entry));
        }

        let entry = Rc::new(compute(engine, model, pocket)?);
        self.misses += 1;
        log::debug!(
            "selection for {}: {} atoms, {} residues",
            pocket.name,
            entry.atoms.len(),
            entry.residues.len()
        );
        let _ = self.entries.insert(key, Rc::clone(&entry));
        Ok(entry)
    }

    /// Cached entry, if already computed.
    #[must_use]
    pub fn get(
        &self,
        model: ModelId,
        pocket: &PocketDescriptor,
    ) -> Option<Rc<SelectionEntry>> {
        self.entries.get(&(model, pocket.name.clone())).cloned()
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses) since creation.
    #[must_use]
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

fn compute<E: VisualizationEngine + ?Sized>(
    engine: &E,
    model: ModelId,
    pocket: &PocketDescriptor,
) -> Result<SelectionEntry, EngineError> {
    let atom_query = SelectionQuery::AtomsById(pocket.surface.clone());
    let residue_query = SelectionQuery::ResiduesById(pocket.residues.clone());
    let atoms = engine.query_atoms(model, &atom_query)?;
    let residues = engine.query_residues(model, &residue_query)?;
    let label = engine.selection_label(model, &atoms)?;
    Ok(SelectionEntry {
        atom_query,
        residue_query,
        atoms,
        residues,
        label,
    })
}
