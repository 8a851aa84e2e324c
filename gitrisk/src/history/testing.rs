//! Test doubles: a scripted gateway, and throwaway git repositories.

use super::{GitExecutor, HistoryError, VcsGateway};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::process::Command;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

type BlameKey = (String, String, u32, u32);

/// Gateway that answers from canned text; anything not scripted fails the
/// way git does for an unknown revision.
#[derive(Default)]
pub struct FakeGateway {
    latest: Option<String>,
    logs: HashMap<Option<String>, String>,
    fixes: Option<String>,
    changed: HashMap<String, String>,
    diffs: HashMap<(String, String), String>,
    blames: HashMap<BlameKey, String>,
    delays: HashMap<BlameKey, Duration>,
    calls: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latest(mut self, hash: &str) -> Self {
        self.latest = Some(hash.to_string());
        self
    }

    pub fn with_log(mut self, commit: Option<&str>, text: &str) -> Self {
        self.logs.insert(commit.map(String::from), text.to_string());
        self
    }

    pub fn with_fixes(mut self, hashes: &[&str]) -> Self {
        self.fixes = Some(hashes.join("\n"));
        self
    }

    pub fn with_changed_files(mut self, commit: &str, files: &[&str]) -> Self {
        self.changed.insert(commit.to_string(), files.join("\n"));
        self
    }

    pub fn with_diff(mut self, commit: &str, file: &str, text: &str) -> Self {
        self.diffs
            .insert((commit.to_string(), file.to_string()), text.to_string());
        self
    }

    pub fn with_blame(mut self, rev: &str, file: &str, start: u32, count: u32, text: &str) -> Self {
        self.blames.insert(blame_key(rev, file, start, count), text.to_string());
        self
    }

    /// Make a scripted blame answer only after `delay`.
    pub fn with_blame_delay(
        mut self,
        rev: &str,
        file: &str,
        start: u32,
        count: u32,
        delay: Duration,
    ) -> Self {
        self.delays.insert(blame_key(rev, file, start, count), delay);
        self
    }

    /// Every query issued so far, e.g. `blame abc^ src/a.rs 5 3`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of queries whose description starts with `prefix`.
    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn blame_key(rev: &str, file: &str, start: u32, count: u32) -> BlameKey {
    (rev.to_string(), file.to_string(), start, count)
}

fn unknown(what: String) -> HistoryError {
    HistoryError::CommandFailed(format!("fatal: bad revision or path: {}", what))
}

#[async_trait]
impl VcsGateway for FakeGateway {
    async fn latest_commit(&self) -> Result<String, HistoryError> {
        self.record("latest".to_string());
        self.latest.clone().ok_or_else(|| unknown("HEAD".to_string()))
    }

    async fn log(&self, commit: Option<&str>) -> Result<String, HistoryError> {
        self.record(format!("log {}", commit.unwrap_or("--all")));
        self.logs
            .get(&commit.map(String::from))
            .cloned()
            .ok_or_else(|| unknown(commit.unwrap_or("HEAD").to_string()))
    }

    async fn fix_commits(&self, keywords: &[String]) -> Result<String, HistoryError> {
        self.record(format!("fixes {}", keywords.join(",")));
        Ok(self.fixes.clone().unwrap_or_default())
    }

    async fn changed_files(&self, commit: &str) -> Result<String, HistoryError> {
        self.record(format!("files {}", commit));
        self.changed
            .get(commit)
            .cloned()
            .ok_or_else(|| unknown(format!("{}^", commit)))
    }

    async fn file_diff(&self, commit: &str, path: &str) -> Result<String, HistoryError> {
        self.record(format!("diff {} {}", commit, path));
        self.diffs
            .get(&(commit.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| unknown(format!("{}^ -- {}", commit, path)))
    }

    async fn blame(
        &self,
        revision: &str,
        path: &str,
        start: u32,
        count: u32,
    ) -> Result<String, HistoryError> {
        self.record(format!("blame {} {} {} {}", revision, path, start, count));
        let key = blame_key(revision, path, start, count);
        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }
        self.blames
            .get(&key)
            .cloned()
            .ok_or_else(|| unknown(format!("{} -- {}", revision, path)))
    }
}

/// A git repository in a temporary directory, committed to by a fixed author.
pub struct TempRepo {
    dir: TempDir,
}

impl TempRepo {
    /// `None` when git cannot be run on this machine.
    pub fn init() -> Option<Self> {
        let repo = Self {
            dir: TempDir::new().ok()?,
        };
        repo.git(&["init", "-q"]).map(|_| repo)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Executor over this repository, or `None` when git is unavailable.
    pub async fn executor(&self) -> Option<GitExecutor> {
        match GitExecutor::new(self.path()).await {
            Ok(executor) => Some(executor),
            Err(HistoryError::GitNotAvailable) | Err(HistoryError::IoError(_)) => None,
            Err(e) => panic!("unexpected error opening test repository: {}", e),
        }
    }

    /// Write `contents` to `file`, commit it, and return the full commit id.
    pub fn commit(&self, file: &str, contents: &[u8], message: &str) -> String {
        std::fs::write(self.path().join(file), contents).unwrap();
        self.git(&["add", file]).unwrap();
        self.git(&["commit", "-q", "-m", message]).unwrap();
        let head = self.git(&["rev-parse", "HEAD"]).unwrap();
        String::from_utf8(head).unwrap().trim().to_string()
    }

    fn git(&self, args: &[&str]) -> Option<Vec<u8>> {
        let output = Command::new("git")
            .current_dir(self.path())
            .args([
                "-c",
                "user.name=Jane Doe",
                "-c",
                "user.email=jane@example.com",
                "-c",
                "commit.gpgsign=false",
            ])
            .args(args)
            .output()
            .ok()?;
        output.status.success().then_some(output.stdout)
    }
}
