//! Fix-commit identification.

use super::types::FixCommit;
use super::{HistoryError, VcsGateway};

/// Keywords searched for in commit messages when none are configured.
pub const DEFAULT_FIX_KEYWORDS: &[&str] = &["bug", "fix"];

/// Find commits anywhere in history whose message mentions any keyword.
///
/// Keywords match case-insensitively as plain substrings, so "bug report"
/// commits are picked up alongside fixes. Hashes come back in the order git
/// reports them, with the full id kept for later queries. An empty result is
/// `HistoryError::NoFixCommits`.
pub async fn find_fix_commits(
    gateway: &dyn VcsGateway,
    keywords: &[String],
) -> Result<Vec<FixCommit>, HistoryError> {
    if keywords.is_empty() {
        return Err(HistoryError::NoFixCommits { keywords: vec![] });
    }

    let output = gateway.fix_commits(keywords).await?;
    let commits: Vec<FixCommit> = output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(FixCommit::new)
        .collect();

    if commits.is_empty() {
        return Err(HistoryError::NoFixCommits {
            keywords: keywords.to_vec(),
        });
    }

    tracing::info!("Found {} fix commits", commits.len());
    Ok(commits)
}
