//! Error types
//!
//! Only configuration and asset boundaries return errors; the simulation
//! itself clamps or ignores bad input.

use thiserror::Error;

use crate::sim::MatchPhase;

/// Rejected match lifecycle requests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("no level named '{0}'")]
    UnknownLevel(String),

    #[error("cannot select a level while the match is in {0:?}")]
    SelectionLocked(MatchPhase),
}

/// Errors reading level presets or settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse level presets: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("preset '{name}' has a non-positive {field}")]
    InvalidPreset { name: String, field: &'static str },
}

/// Asset fetch/decode failures. Always recovered with a fallback.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("network error loading {path}: {reason}")]
    Network { path: String, reason: String },
}

impl AssetError {
    /// Path of the asset that failed
    pub fn path(&self) -> &str {
        match self {
            AssetError::NotFound(path) => path,
            AssetError::Decode { path, .. } | AssetError::Network { path, .. } => path,
        }
    }
}
