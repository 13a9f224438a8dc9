use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifies one prediction on a prediction server: a database name plus an
/// identifier within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PredictionId {
    /// Database name (e.g. `v3-alphafold`).
    pub database: String,
    /// Identifier within the database.
    pub id: String,
}

impl PredictionId {
    /// Convenience constructor.
    #[must_use]
    pub fn new(database: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            id: id.into(),
        }
    }
}

/// A named region of the sequence (chain or domain).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Region name.
    pub name: String,
    /// First residue position.
    pub start: usize,
    /// Last residue position.
    pub end: usize,
}

/// Per-residue score arrays, parallel to [`StructureData::indices`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scores {
    /// Evolutionary conservation per residue.
    pub conservation: Option<Vec<f64>>,
    /// AlphaFold predicted confidence (pLDDT) per residue.
    pub plddt: Option<Vec<f64>>,
}

/// Sequence and residue-index data for the predicted structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureData {
    /// Residue identifiers in structure order (e.g. `A_42`).
    pub indices: Vec<String>,
    /// One-letter residue codes in structure order.
    pub sequence: Vec<String>,
    /// Positions of residues flagged as binding.
    pub binding: Vec<usize>,
    /// Chain/domain regions.
    pub regions: Vec<Region>,
    /// Per-residue score arrays.
    pub scores: Scores,
}

impl StructureData {
    /// Number of residues in the structure.
    #[must_use]
    pub fn residue_count(&self) -> usize {
        self.indices.len()
    }

    /// Whether confidence scores are available (predicted structures only).
    #[must_use]
    pub fn has_confidence(&self) -> bool {
        self.scores.plddt.as_ref().is_some_and(|s| !s.is_empty())
    }
}

/// A predicted binding pocket. Immutable for the lifetime of a load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PocketDescriptor {
    /// Pocket name; also the scene reference of the pocket's root entity.
    pub name: String,
    /// Rank of the pocket (1 = best).
    #[serde(deserialize_with = "lenient")]
    pub rank: u32,
    /// Raw pocket score.
    #[serde(default, deserialize_with = "lenient")]
    pub score: f64,
    /// Calibrated probability of being a true binding site.
    #[serde(default, deserialize_with = "lenient")]
    pub probability: f64,
    /// Pocket center in model coordinates.
    #[serde(default, deserialize_with = "lenient_center")]
    pub center: [f64; 3],
    /// Residue identifiers lining the pocket, in prediction order.
    pub residues: Vec<String>,
    /// Surface atom serial ids, in prediction order.
    #[serde(deserialize_with = "lenient_vec")]
    pub surface: Vec<u32>,
}

/// The complete prediction payload for one structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionData {
    /// Sequence, residue indices and scores.
    pub structure: StructureData,
    /// Pockets in rank order.
    pub pockets: Vec<PocketDescriptor>,
    /// Free-form metadata from the server.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl PredictionData {
    /// Whether the server flagged the structure as predicted rather than
    /// experimental. Falls back to the presence of confidence scores.
    #[must_use]
    pub fn is_predicted(&self) -> bool {
        self.metadata
            .get("predictedStructure")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or_else(|| self.structure.has_confidence())
    }
}

// Prediction servers emit numeric fields as either JSON numbers or strings.

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString<T> {
    Number(T),
    String(String),
}

impl<T: FromStr> NumberOrString<T> {
    fn into_value<E: serde::de::Error>(self) -> Result<T, E> {
        match self {
            Self::Number(v) => Ok(v),
            Self::String(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("not a number: {s:?}"))),
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
{
    NumberOrString::<T>::deserialize(deserializer)?.into_value()
}

fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
{
    Vec::<NumberOrString<T>>::deserialize(deserializer)?
        .into_iter()
        .map(NumberOrString::into_value)
        .collect()
}

fn lenient_center<'de, D>(deserializer: D) -> Result<[f64; 3], D::Error>
where
    D: Deserializer<'de>,
{
    let values: Vec<f64> = lenient_vec(deserializer)?;
    match values.as_slice() {
        [x, y, z] => Ok([*x, *y, *z]),
        _ => Err(serde::de::Error::invalid_length(
            values.len(),
            &"three coordinates",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pocket_accepts_string_numbers() {
        let json = r#"{
            "name": "pocket1",
            "rank": "1",
            "score": "12.5",
            "probability": "0.81",
            "center": ["1.0", "2.0", "3.5"],
            "residues": ["A_10", "A_11"],
            "surface": ["101", "102", "230"]
        }"#;
        let pocket: PocketDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(pocket.rank, 1);
        assert_eq!(pocket.score, 12.5);
        assert_eq!(pocket.center, [1.0, 2.0, 3.5]);
        assert_eq!(pocket.surface, vec![101, 102, 230]);
    }

    #[test]
    fn pocket_accepts_plain_numbers() {
        let json = r#"{
            "name": "pocket2",
            "rank": 2,
            "center": [0, 0, 0],
            "residues": [],
            "surface": [7]
        }"#;
        let pocket: PocketDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(pocket.rank, 2);
        assert_eq!(pocket.probability, 0.0);
        assert_eq!(pocket.surface, vec![7]);
    }

    #[test]
    fn center_with_wrong_arity_is_rejected() {
        let json = r#"{
            "name": "p", "rank": 1, "center": [1, 2],
            "residues": [], "surface": []
        }"#;
        assert!(serde_json::from_str::<PocketDescriptor>(json).is_err());
    }

    #[test]
    fn predicted_flag_prefers_metadata() {
        let mut data = PredictionData {
            structure: StructureData {
                scores: Scores {
                    conservation: None,
                    plddt: Some(vec![90.0]),
                },
                ..StructureData::default()
            },
            pockets: vec![],
            metadata: serde_json::json!({ "predictedStructure": false }),
        };
        assert!(!data.is_predicted());
        data.metadata = serde_json::Value::Null;
        assert!(data.is_predicted());
    }
}
