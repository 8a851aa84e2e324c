//! Error types for history queries and parsing.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while querying or parsing repository history.
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Git is not available on this system")]
    GitNotAvailable,

    #[error("Path is not a git repository: {0}")]
    NotARepository(PathBuf),

    #[error("Git command failed: {0}")]
    CommandFailed(String),

    #[error("Git query timed out after {0:?}: {1}")]
    Timeout(Duration, String),

    #[error("Malformed log entry #{entry} ({header}): {reason}")]
    Parse {
        entry: usize,
        header: String,
        reason: String,
    },

    #[error("No fix commits found: no commit message contains {}", quoted(.keywords))]
    NoFixCommits { keywords: Vec<String> },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("UTF-8 decoding error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
}

impl HistoryError {
    /// Whether this error must halt the whole pipeline.
    ///
    /// Gateway failures raised while tracing a single diff or blame range are
    /// recovered by the tracer and never reach this check.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::NoFixCommits { .. })
    }
}

fn quoted(keywords: &[String]) -> String {
    keywords
        .iter()
        .map(|k| format!("\"{}\"", k))
        .collect::<Vec<_>>()
        .join(" or ")
}
