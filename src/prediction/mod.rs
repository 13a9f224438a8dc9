//! Prediction payloads: the structure's residue index, per-residue scores and
//! the ranked pocket list, plus the loaders that fetch them.

mod loader;
mod model;

#[cfg(feature = "http")]
pub use loader::HttpPredictionLoader;
pub use loader::{
    parse_prediction, FilePredictionLoader, PredictionLoader, PREDICTION_FILE,
};
pub use model::{
    PocketDescriptor, PredictionData, PredictionId, Region, Scores,
    StructureData,
};
