use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// The forest handed to the engine is not a tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("Node '{0}' appears twice on the same root-to-leaf path")]
    Cycle(String),

    #[error("Node identity '{0}' is used more than once in the forest")]
    DuplicateIdentity(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("Unknown connector style '{0}' (expected straight, curved or step)")]
    InvalidStyle(String),
}

#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("Structural error: {0}")]
    Structural(#[from] StructuralError),

    #[error("Routing error: {0}")]
    Route(#[from] RouteError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization/Deserialization error (JSON): {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

pub type CanvasResult<T> = Result<T, CanvasError>;
