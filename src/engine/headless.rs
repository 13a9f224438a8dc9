//! In-memory engine without a renderer.
//!
//! Keeps a flat list of scene entities with visibility flags, one model per
//! load, and a log of every command it receives. Direct user interaction in
//! a real viewer is simulated with [`HeadlessEngine::user_set_visibility`].

use rustc_hash::{FxHashMap, FxHashSet};

use super::{
    refs, EngineCommand, EngineError, EntityRef, ModelId, NodeChanged, NodeId,
    SelectionQuery, VisualizationEngine,
};
use crate::color::ColorAssignment;
use crate::options::PolymerColor;
use crate::prediction::{PocketDescriptor, PredictionData};

#[derive(Debug, Clone)]
struct Node {
    reference: EntityRef,
    visible: bool,
}

/// Headless models carry no atom-to-residue topology: atoms are the sorted
/// set of surface serials named by the prediction's pockets.
#[derive(Debug, Clone)]
struct Model {
    id: ModelId,
    serials: Vec<u32>,
    residues: FxHashMap<String, usize>,
    residue_count: usize,
    mapping: Option<ColorAssignment>,
}

impl Model {
    fn atom_index(&self, serial: u32) -> Option<usize> {
        self.serials.binary_search(&serial).ok()
    }
}

/// Headless [`VisualizationEngine`].
#[derive(Debug, Default)]
pub struct HeadlessEngine {
    nodes: Vec<Node>,
    model: Option<Model>,
    next_model: u64,
    commands: Vec<EngineCommand>,
    pending: Vec<NodeChanged>,
    tooltip: Vec<String>,
    rejected: FxHashSet<EntityRef>,
    mapping_disabled: bool,
}

impl HeadlessEngine {
    /// Empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Inspection --

    /// Every command received since the last [`clear_commands`](Self::clear_commands).
    #[must_use]
    pub fn commands(&self) -> &[EngineCommand] {
        &self.commands
    }

    /// Forget the command log.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Visibility of the entity behind `reference`.
    #[must_use]
    pub fn is_visible(&self, reference: &str) -> Option<bool> {
        self.nodes
            .iter()
            .find(|n| n.reference.as_str() == reference)
            .map(|n| n.visible)
    }

    /// Current tooltip lines.
    #[must_use]
    pub fn tooltip(&self) -> &[String] {
        &self.tooltip
    }

    /// Number of atoms in the loaded model.
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.model.as_ref().map_or(0, |m| m.serials.len())
    }

    // -- Simulation --

    /// Change visibility the way a user clicking in the 3D view would. The
    /// change is queued as a notification like any other.
    pub fn user_set_visibility(
        &mut self,
        reference: &str,
        visible: bool,
    ) -> Result<(), EngineError> {
        let entity = EntityRef::new(reference);
        let node = self
            .resolve(&entity)
            .ok_or(EngineError::EntityNotFound(entity))?;
        self.apply_visibility(node, visible);
        Ok(())
    }

    /// Make every visibility command targeting `reference` fail.
    pub fn reject_commands_for(&mut self, reference: &str) {
        let _ = self.rejected.insert(EntityRef::new(reference));
    }

    /// Stop producing color mappings, as an engine that has not finished
    /// building its color theme would.
    pub fn disable_color_mapping(&mut self) {
        self.mapping_disabled = true;
        if let Some(model) = self.model.as_mut() {
            model.mapping = None;
        }
    }

    // -- Internals --

    fn add_node(&mut self, reference: EntityRef, visible: bool) {
        self.nodes.push(Node { reference, visible });
    }

    fn apply_visibility(&mut self, node: NodeId, visible: bool) {
        let Some(entry) = self.nodes.get_mut(node.0 as usize) else {
            return;
        };
        if entry.visible != visible {
            entry.visible = visible;
            self.pending.push(NodeChanged {
                entity: entry.reference.clone(),
                visible,
            });
        }
    }

    fn model_ref(&self, id: ModelId) -> Result<&Model, EngineError> {
        self.model
            .as_ref()
            .filter(|m| m.id == id)
            .ok_or(EngineError::ModelNotFound(id))
    }

    fn model_mut(&mut self, id: ModelId) -> Result<&mut Model, EngineError> {
        self.model
            .as_mut()
            .filter(|m| m.id == id)
            .ok_or(EngineError::ModelNotFound(id))
    }
}

fn sorted_unique(mut indices: Vec<usize>) -> Vec<usize> {
    indices.sort_unstable();
    indices.dedup();
    indices
}

impl VisualizationEngine for HeadlessEngine {
    fn clear(&mut self) {
        self.nodes.clear();
        self.model = None;
        self.pending.clear();
        self.tooltip.clear();
    }

    fn load_structure(
        &mut self,
        prediction: &PredictionData,
    ) -> Result<ModelId, EngineError> {
        let mut serials: Vec<u32> = prediction
            .pockets
            .iter()
            .flat_map(|p| p.surface.iter().copied())
            .collect();
        serials.sort_unstable();
        serials.dedup();

        let residues = prediction
            .structure
            .indices
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        let id = ModelId(self.next_model);
        self.next_model += 1;
        self.model = Some(Model {
            id,
            serials,
            residues,
            residue_count: prediction.structure.residue_count(),
            mapping: None,
        });
        for reference in
            [refs::POLYMER_ATOMS, refs::POLYMER_SURFACE, refs::POLYMER_CARTOON]
        {
            self.add_node(EntityRef::from(reference), true);
        }
        log::debug!(
            "headless model {}: {} atoms, {} residues",
            id.0,
            self.atom_count(),
            prediction.structure.residue_count()
        );
        Ok(id)
    }

    fn build_pockets(
        &mut self,
        model: ModelId,
        pockets: &[PocketDescriptor],
    ) -> Result<(), EngineError> {
        let _ = self.model_ref(model)?;
        for pocket in pockets {
            self.add_node(refs::pocket_root(pocket), true);
            self.add_node(refs::pocket_atoms(pocket), true);
            self.add_node(refs::pocket_surface(pocket), true);
        }
        Ok(())
    }

    fn build_confident_region(
        &mut self,
        model: ModelId,
        plddt: &[f64],
    ) -> Result<(), EngineError> {
        let _ = self.model_ref(model)?;
        if plddt.is_empty() {
            return Err(EngineError::Rejected(
                "no confidence scores".to_owned(),
            ));
        }
        for reference in [
            refs::CONFIDENT_ATOMS,
            refs::CONFIDENT_SURFACE,
            refs::CONFIDENT_CARTOON,
        ] {
            self.add_node(EntityRef::from(reference), false);
        }
        Ok(())
    }

    fn model(&self) -> Option<ModelId> {
        self.model.as_ref().map(|m| m.id)
    }

    fn query_atoms(
        &self,
        model: ModelId,
        query: &SelectionQuery,
    ) -> Result<Vec<usize>, EngineError> {
        let model = self.model_ref(model)?;
        Ok(match query {
            SelectionQuery::AtomsById(serials) => sorted_unique(
                serials.iter().filter_map(|&s| model.atom_index(s)).collect(),
            ),
            SelectionQuery::ResiduesById(_) => Vec::new(),
        })
    }

    fn query_residues(
        &self,
        model: ModelId,
        query: &SelectionQuery,
    ) -> Result<Vec<usize>, EngineError> {
        let model = self.model_ref(model)?;
        Ok(match query {
            SelectionQuery::AtomsById(_) => Vec::new(),
            SelectionQuery::ResiduesById(ids) => sorted_unique(
                ids.iter()
                    .filter_map(|id| model.residues.get(id).copied())
                    .collect(),
            ),
        })
    }

    fn selection_label(
        &self,
        model: ModelId,
        atoms: &[usize],
    ) -> Result<String, EngineError> {
        let model = self.model_ref(model)?;
        Ok(match atoms {
            [] => "Empty selection".to_owned(),
            [single] => model
                .serials
                .get(*single)
                .map_or_else(|| "1 atom".to_owned(), |s| format!("Atom {s}")),
            _ => format!("{} atoms", atoms.len()),
        })
    }

    fn resolve(&self, entity: &EntityRef) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| &n.reference == entity)
            .map(|i| NodeId(i as u32))
    }

    fn set_visibility(
        &mut self,
        node: NodeId,
        visible: bool,
    ) -> Result<(), EngineError> {
        let entity = self
            .nodes
            .get(node.0 as usize)
            .map(|n| n.reference.clone())
            .ok_or_else(|| {
                EngineError::Rejected(format!("stale node {}", node.0))
            })?;
        if self.rejected.contains(&entity) {
            return Err(EngineError::Rejected(format!("{entity} is locked")));
        }
        self.commands
            .push(EngineCommand::SetVisibility { entity, visible });
        self.apply_visibility(node, visible);
        Ok(())
    }

    fn color_polymer(
        &mut self,
        model: ModelId,
        mode: PolymerColor,
    ) -> Result<(), EngineError> {
        let disabled = self.mapping_disabled;
        let entry = self.model_mut(model)?;
        entry.mapping = (!disabled).then(|| {
            ColorAssignment::new(entry.serials.len(), entry.residue_count)
        });
        self.commands.push(EngineCommand::ColorPolymer { model, mode });
        Ok(())
    }

    fn color_mapping(&self, model: ModelId) -> Option<ColorAssignment> {
        self.model_ref(model).ok()?.mapping.clone()
    }

    fn set_color_mapping(
        &mut self,
        model: ModelId,
        mapping: ColorAssignment,
    ) -> Result<(), EngineError> {
        self.model_mut(model)?.mapping = Some(mapping);
        self.commands.push(EngineCommand::SetColorMapping { model });
        Ok(())
    }

    fn focus(
        &mut self,
        model: ModelId,
        query: &SelectionQuery,
    ) -> Result<(), EngineError> {
        let _ = self.model_ref(model)?;
        self.commands.push(EngineCommand::Focus {
            model,
            query: query.clone(),
        });
        Ok(())
    }

    fn highlight(
        &mut self,
        model: ModelId,
        query: &SelectionQuery,
        on: bool,
    ) -> Result<(), EngineError> {
        let _ = self.model_ref(model)?;
        self.commands.push(EngineCommand::Highlight {
            model,
            query: query.clone(),
            on,
        });
        Ok(())
    }

    fn show_tooltip(&mut self, lines: &[String]) {
        self.tooltip = lines.to_vec();
        self.commands.push(EngineCommand::Tooltip(lines.to_vec()));
    }

    fn take_notifications(&mut self) -> Vec<NodeChanged> {
        std::mem::take(&mut self.pending)
    }
}
