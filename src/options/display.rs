use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How the whole polymer is represented.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum PolymerView {
    /// Ball-and-stick atoms.
    Atoms,
    /// Molecular surface.
    #[default]
    Surface,
    /// Cartoon.
    Cartoon,
}

/// How visible pockets are represented.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum PocketsView {
    /// Ball-and-stick pocket atoms.
    Atoms,
    /// Pocket surface patch.
    #[default]
    Surface,
}

/// Baseline coloring of the polymer, beneath pocket overlays.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum PolymerColor {
    /// Uniform color.
    Clean,
    /// Evolutionary conservation.
    #[default]
    Conservation,
    /// AlphaFold confidence (pLDDT).
    AlphaFold,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Default,
    JsonSchema,
)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Representation and coloring mode selections.
pub struct DisplayOptions {
    /// Polymer representation.
    #[schemars(title = "Polymer View")]
    pub polymer_view: PolymerView,
    /// Pocket representation.
    #[schemars(title = "Pockets View")]
    pub pockets_view: PocketsView,
    /// Only show confidently predicted residues.
    #[schemars(title = "Show Only Confident")]
    pub show_only_confident: bool,
    /// Baseline polymer coloring.
    #[schemars(title = "Polymer Color")]
    pub polymer_color: PolymerColor,
}
