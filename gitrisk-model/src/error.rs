//! Error types for gitrisk-model

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while training, scoring or persisting a classifier
#[derive(Debug, Error)]
pub enum ModelError {
    /// No persisted model exists at the expected location
    #[error("No trained model found at {}", .0.display())]
    NotFound(PathBuf),

    /// Training was requested with zero examples
    #[error("Cannot train on an empty dataset")]
    EmptyTrainingSet,

    /// Feature and label counts disagree, or rows have different widths
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Prediction was requested before `fit`
    #[error("Model has not been fitted")]
    NotFitted,

    /// Persisted model was written by an incompatible version
    #[error("Unsupported model format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// Serialization error (bincode)
    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ModelError {
    /// Create a shape mismatch error
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    /// Whether this error means "train first" rather than a real failure
    pub fn is_missing_model(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;
