//! Raw-text access to repository history.
//!
//! Every method returns git's output verbatim; all interpretation happens in
//! the parser, identifier and tracer so they can be exercised against canned
//! text.

use super::HistoryError;
use async_trait::async_trait;

#[async_trait]
pub trait VcsGateway: Send + Sync {
    /// Full hash of the most recent commit.
    async fn latest_commit(&self) -> Result<String, HistoryError>;

    /// `git log --stat` text for one commit, or the whole history when `None`.
    async fn log(&self, commit: Option<&str>) -> Result<String, HistoryError>;

    /// Hashes of commits whose message contains any keyword, case-insensitively,
    /// one per line.
    async fn fix_commits(&self, keywords: &[String]) -> Result<String, HistoryError>;

    /// Paths changed by `commit` relative to its first parent, one per line.
    async fn changed_files(&self, commit: &str) -> Result<String, HistoryError>;

    /// Zero-context unified diff of one file between `commit^` and `commit`.
    async fn file_diff(&self, commit: &str, path: &str) -> Result<String, HistoryError>;

    /// Blame of `count` lines starting at `start` in `path` as of `revision`,
    /// each output line prefixed by the attributed commit hash.
    async fn blame(
        &self,
        revision: &str,
        path: &str,
        start: u32,
        count: u32,
    ) -> Result<String, HistoryError>;
}
