//! Crate-level error types.

use std::fmt;

use crate::engine::{EngineError, ModelId};
use crate::sync::LoadTicket;

/// Why a structure load did not produce a view-model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The prediction could not be fetched.
    Fetch(String),
    /// The prediction was fetched but could not be decoded.
    Parse(String),
    /// The engine rejected the structure or the pocket scene.
    Engine(String),
    /// The engine did not expose a structural model after loading.
    ModelUnavailable,
    /// The engine did not expose color-mapping arrays after baseline
    /// coloring.
    MappingUnavailable,
    /// A newer load started before this one resolved; the result was
    /// discarded.
    Superseded {
        /// Ticket of the discarded load.
        ticket: LoadTicket,
        /// Ticket of the load that is currently in flight.
        current: LoadTicket,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(msg) => write!(f, "prediction fetch failed: {msg}"),
            Self::Parse(msg) => write!(f, "prediction parse failed: {msg}"),
            Self::Engine(msg) => write!(f, "scene construction failed: {msg}"),
            Self::ModelUnavailable => write!(f, "model not found after load"),
            Self::MappingUnavailable => {
                write!(f, "color mapping not found after load")
            }
            Self::Superseded { ticket, current } => write!(
                f,
                "load {} superseded by load {}",
                ticket.generation(),
                current.generation()
            ),
        }
    }
}

impl std::error::Error for LoadError {}

/// The engine cannot supply base atom/residue color arrays for a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingUnavailable {
    /// Model the mapping was requested for.
    pub model: ModelId,
}

impl fmt::Display for MappingUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "color mapping unavailable for model {}", self.model.0)
    }
}

impl std::error::Error for MappingUnavailable {}

/// Errors produced by the pocketview crate.
#[derive(Debug)]
pub enum PocketViewError {
    /// Structure load failure.
    Load(LoadError),
    /// A command sent to the visualization engine failed.
    Engine(EngineError),
    /// A pocket index outside the current view-model.
    PocketIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of pockets in the view-model.
        len: usize,
    },
    /// An operation that needs a loaded structure was called before one
    /// was published.
    NotLoaded,
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for PocketViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(e) => write!(f, "load error: {e}"),
            Self::Engine(e) => write!(f, "engine error: {e}"),
            Self::PocketIndexOutOfRange { index, len } => {
                write!(f, "pocket index {index} out of range (0..{len})")
            }
            Self::NotLoaded => write!(f, "no structure loaded"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for PocketViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            Self::Engine(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LoadError> for PocketViewError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

impl From<EngineError> for PocketViewError {
    fn from(e: EngineError) -> Self {
        Self::Engine(e)
    }
}

impl From<std::io::Error> for PocketViewError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
