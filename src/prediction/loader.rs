//! Prediction data loaders.
//!
//! A [`PredictionLoader`] turns a [`PredictionId`] into decoded
//! [`PredictionData`]. Failures are reported as [`LoadError`] so the
//! synchronization core can surface them as a retryable load state.

use std::path::{Path, PathBuf};

use super::{PredictionData, PredictionId};
use crate::error::LoadError;

/// File name of the prediction payload within a prediction directory.
pub const PREDICTION_FILE: &str = "prediction.json";

/// Source of prediction payloads.
pub trait PredictionLoader {
    /// Fetch and decode the prediction identified by `id`.
    fn fetch(&mut self, id: &PredictionId) -> Result<PredictionData, LoadError>;
}

impl<F> PredictionLoader for F
where
    F: FnMut(&PredictionId) -> Result<PredictionData, LoadError>,
{
    fn fetch(&mut self, id: &PredictionId) -> Result<PredictionData, LoadError> {
        self(id)
    }
}

/// Decode a prediction payload.
pub fn parse_prediction(json: &str) -> Result<PredictionData, LoadError> {
    serde_json::from_str(json).map_err(|e| LoadError::Parse(e.to_string()))
}

/// Reads `<root>/<database>/<id>/prediction.json` from disk.
#[derive(Debug, Clone)]
pub struct FilePredictionLoader {
    root: PathBuf,
}

impl FilePredictionLoader {
    /// Loader rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the payload for `id`.
    #[must_use]
    pub fn path_for(&self, id: &PredictionId) -> PathBuf {
        self.root.join(&id.database).join(&id.id).join(PREDICTION_FILE)
    }

    /// Root directory this loader reads from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PredictionLoader for FilePredictionLoader {
    fn fetch(&mut self, id: &PredictionId) -> Result<PredictionData, LoadError> {
        let path = self.path_for(id);
        log::debug!("reading prediction from {}", path.display());
        let content = std::fs::read_to_string(&path).map_err(|e| {
            LoadError::Fetch(format!("{}: {e}", path.display()))
        })?;
        parse_prediction(&content)
    }
}

/// Fetches predictions from a prediction server over HTTP.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpPredictionLoader {
    base_url: String,
}

#[cfg(feature = "http")]
impl HttpPredictionLoader {
    /// Loader for the server at `base_url` (no trailing slash needed).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// URL of the payload for `id`.
    #[must_use]
    pub fn url_for(&self, id: &PredictionId) -> String {
        format!(
            "{}/api/v2/prediction/{}/{}/public/{PREDICTION_FILE}",
            self.base_url, id.database, id.id
        )
    }
}

#[cfg(feature = "http")]
impl PredictionLoader for HttpPredictionLoader {
    fn fetch(&mut self, id: &PredictionId) -> Result<PredictionData, LoadError> {
        let url = self.url_for(id);
        log::info!("Downloading prediction {}/{}", id.database, id.id);
        let content = ureq::get(&url)
            .call()
            .map_err(|e| LoadError::Fetch(format!("{url}: {e}")))?
            .into_body()
            .read_to_string()
            .map_err(|e| LoadError::Fetch(format!("{url}: {e}")))?;
        parse_prediction(&content)
    }
}
