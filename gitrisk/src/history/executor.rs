//! Git command execution wrapper.

use super::{HistoryError, VcsGateway};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Wrapper for executing git commands against one repository.
pub struct GitExecutor {
    repo_path: PathBuf,
}

impl GitExecutor {
    /// Create a new git executor for the given repository path.
    pub async fn new(repo_path: &Path) -> Result<Self, HistoryError> {
        // Verify git is available
        let output = Command::new("git").arg("--version").output().await?;

        if !output.status.success() {
            return Err(HistoryError::GitNotAvailable);
        }

        // Verify path is a git repository
        let output = Command::new("git")
            .current_dir(repo_path)
            .args(["rev-parse", "--git-dir"])
            .output()
            .await?;

        if !output.status.success() {
            return Err(HistoryError::NotARepository(repo_path.to_path_buf()));
        }

        Ok(Self {
            repo_path: repo_path.to_path_buf(),
        })
    }

    /// Get repository root path as passed in.
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// Top-level directory of the working tree.
    pub async fn toplevel(&self) -> Result<PathBuf, HistoryError> {
        let stdout = self.run(&["rev-parse", "--show-toplevel"]).await?;
        Ok(PathBuf::from(stdout.trim()))
    }

    /// Run git and decode its output strictly as UTF-8.
    async fn run(&self, args: &[&str]) -> Result<String, HistoryError> {
        let stdout = self.output(args).await?;
        Ok(String::from_utf8(stdout)?)
    }

    /// Run git on a query that prints file content.
    ///
    /// Content may be in any encoding; callers only read the ASCII hunk
    /// headers and commit ids, so invalid bytes are replaced.
    async fn run_lossy(&self, args: &[&str]) -> Result<String, HistoryError> {
        let stdout = self.output(args).await?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    async fn output(&self, args: &[&str]) -> Result<Vec<u8>, HistoryError> {
        tracing::trace!("git {}", args.join(" "));

        let output = Command::new("git")
            .current_dir(&self.repo_path)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HistoryError::CommandFailed(format!(
                "git {}: {}",
                args.join(" "),
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl VcsGateway for GitExecutor {
    async fn latest_commit(&self) -> Result<String, HistoryError> {
        let stdout = self.run(&["log", "-1", "--pretty=format:%H"]).await?;
        Ok(stdout.trim().to_string())
    }

    async fn log(&self, commit: Option<&str>) -> Result<String, HistoryError> {
        let mut args = vec![
            "log",
            "--stat",
            "--no-color",
            "--no-decorate",
            "--date=default",
        ];

        if let Some(c) = commit {
            args.extend(["-1", c]);
        }

        self.run(&args).await
    }

    async fn fix_commits(&self, keywords: &[String]) -> Result<String, HistoryError> {
        let greps: Vec<String> = keywords.iter().map(|k| format!("--grep={}", k)).collect();

        let mut args = vec![
            "log",
            "-i", // case insensitive
            "--fixed-strings",
            "--all",
            "--pretty=format:%H",
        ];
        args.extend(greps.iter().map(String::as_str));

        self.run(&args).await
    }

    async fn changed_files(&self, commit: &str) -> Result<String, HistoryError> {
        let parent = format!("{}^", commit);
        self.run(&["diff", &parent, commit, "--name-only"]).await
    }

    async fn file_diff(&self, commit: &str, path: &str) -> Result<String, HistoryError> {
        let parent = format!("{}^", commit);
        self.run_lossy(&["diff", &parent, commit, "-U0", "--no-color", "--", path])
            .await
    }

    async fn blame(
        &self,
        revision: &str,
        path: &str,
        start: u32,
        count: u32,
    ) -> Result<String, HistoryError> {
        let range = format!("-L{},+{}", start, count);
        self.run_lossy(&["blame", "-s", "-l", &range, revision, "--", path])
            .await
    }
}
