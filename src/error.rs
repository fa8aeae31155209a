// src/error.rs
//! Error taxonomy shared by the generators, the analyzer and the pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mission::Placement;

/// A configuration that cannot be turned into a level.
///
/// Fatal to the single call; the caller is expected to retry with a
/// corrected configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("missing required layout key `{0}`")]
    MissingKey(&'static str),

    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key,
            reason: reason.into(),
        }
    }
}

/// The grid does not contain anything the analyzer can work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("No floor tiles found")]
    NoFloorTiles,

    #[error("No rooms found")]
    NoRooms,
}

/// Top-level error for the pipeline and the JSON entry points.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("malformed configuration document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Structured error result handed back by the objective placer.
///
/// Serializes as `{"error": "...", "placements": []}` so callers can treat
/// "nothing generated" like any other placement result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementFailure {
    pub error: String,
    pub placements: Vec<Placement>,
}

impl From<AnalysisError> for PlacementFailure {
    fn from(err: AnalysisError) -> Self {
        PlacementFailure {
            error: err.to_string(),
            placements: Vec::new(),
        }
    }
}
