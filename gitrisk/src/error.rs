//! Error types for the gitrisk pipeline and CLI.

use crate::history::HistoryError;
use gitrisk_model::ModelError;
use thiserror::Error;

/// Errors that can end a train or predict run.
#[derive(Debug, Error)]
pub enum RiskError {
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Commit not found in log: {0}")]
    CommitNotFound(String),
}

impl RiskError {
    /// The single line shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            RiskError::History(HistoryError::NoFixCommits { .. }) => format!(
                "Failed to find any bug commits by parsing commit logs. {}",
                self.source_message()
            ),
            RiskError::Model(e) if e.is_missing_model() => {
                "could not find trained model. have you run \"gitrisk train\" yet?".to_string()
            }
            _ => self.to_string(),
        }
    }

    fn source_message(&self) -> String {
        match self {
            RiskError::History(e) => e.to_string(),
            RiskError::Model(e) => e.to_string(),
            RiskError::CommitNotFound(c) => c.clone(),
        }
    }
}

/// Result type alias for pipeline operations.
pub type RiskResult<T> = Result<T, RiskError>;
