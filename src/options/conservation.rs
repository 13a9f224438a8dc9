use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What to do with a pocket residue that is not in the structure's residue
/// index.
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
pub enum MissingResidue {
    /// Leave the residue out and average over the residues that resolved.
    #[default]
    Skip,
    /// Report the whole pocket's average as unavailable.
    FailPocket,
}

/// Per-pocket score aggregation settings.
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
#[schemars(title = "Scores", inline)]
#[serde(default)]
pub struct ConservationOptions {
    /// Handling of residues missing from the residue index.
    #[schemars(title = "Missing Residue")]
    pub missing_residue: MissingResidue,
}
