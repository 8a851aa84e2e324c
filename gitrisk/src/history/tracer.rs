//! Bug-origin tracing (SZZ).
//!
//! For every fix commit, the lines it deleted or replaced are blamed in the
//! fix's parent revision; whichever commits last touched those lines are
//! taken to have introduced the bug.

use super::types::{BugIntroducingSet, DiffHunk, FixCommit, ShortHash};
use super::{HistoryError, VcsGateway};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// `@@ -start[,count] +start[,count] @@`; only the old-side range is captured.
static HUNK_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+\d+(?:,\d+)? @@").expect("valid regex"));

/// Concurrency and timeout settings for tracing.
#[derive(Debug, Clone, Serialize)]
pub struct TraceConfig {
    /// Fix commits traced at the same time.
    pub max_concurrency: usize,
    /// Upper bound on any single git query.
    pub query_timeout: Duration,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            query_timeout: Duration::from_secs(30),
        }
    }
}

/// Result of tracing one or more fix commits.
#[derive(Debug, Default, Serialize)]
pub struct TraceReport {
    /// Commits identified as introducing a bug.
    pub introducing: BugIntroducingSet,
    /// Number of fix commits examined.
    pub fixes_traced: usize,
    /// Number of blame queries issued.
    pub blame_queries: usize,
    /// Sub-queries that failed and were skipped (non-fatal).
    pub warnings: Vec<String>,
}

impl TraceReport {
    fn merge(&mut self, other: TraceReport) {
        self.introducing.union_with(other.introducing);
        self.fixes_traced += other.fixes_traced;
        self.blame_queries += other.blame_queries;
        self.warnings.extend(other.warnings);
    }

    fn skip(&mut self, fix: &FixCommit, what: &str, err: &HistoryError) {
        tracing::warn!("Skipping {} for fix {}: {}", what, fix, err);
        self.warnings.push(format!("{}: {}: {}", fix, what, err));
    }
}

/// Traces fix commits back to the commits that introduced the fixed lines.
pub struct BugTracer {
    gateway: Arc<dyn VcsGateway>,
    config: TraceConfig,
}

impl BugTracer {
    pub fn new(gateway: Arc<dyn VcsGateway>, config: TraceConfig) -> Self {
        Self { gateway, config }
    }

    /// Trace every fix commit and union the results.
    ///
    /// Fix commits are independent of one another and run concurrently, at
    /// most `max_concurrency` at a time. Each task builds its own partial
    /// report; partials are merged as tasks finish.
    pub async fn trace(&self, fixes: &[FixCommit]) -> TraceReport {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for fix in fixes.iter().cloned() {
            let gateway = Arc::clone(&self.gateway);
            let config = self.config.clone();
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                // The semaphore is never closed, so acquisition cannot fail.
                let _permit = semaphore.acquire_owned().await.ok();
                trace_fix(gateway.as_ref(), &fix, &config).await
            });
        }

        let mut report = TraceReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(partial) => report.merge(partial),
                Err(e) => {
                    tracing::error!("Trace task failed: {}", e);
                    report.warnings.push(format!("trace task failed: {}", e));
                }
            }
        }
        report.warnings.sort();

        tracing::info!(
            "Tracing complete: {} bug-introducing commits from {} fixes ({} blame queries, {} skipped)",
            report.introducing.len(),
            report.fixes_traced,
            report.blame_queries,
            report.warnings.len()
        );

        report
    }

    /// Trace a single fix commit.
    pub async fn trace_fix(&self, fix: &FixCommit) -> TraceReport {
        trace_fix(self.gateway.as_ref(), fix, &self.config).await
    }
}

async fn trace_fix(
    gateway: &dyn VcsGateway,
    fix: &FixCommit,
    config: &TraceConfig,
) -> TraceReport {
    let mut report = TraceReport {
        fixes_traced: 1,
        ..TraceReport::default()
    };
    let parent = format!("{}^", fix.id);

    // A root commit has no parent; this fails and the fix contributes nothing.
    let changed = gateway.changed_files(&fix.id);
    let files = match bounded(config, "changed files", changed).await {
        Ok(out) => out,
        Err(e) => {
            report.skip(fix, "changed files", &e);
            return report;
        }
    };

    for file in files.lines().map(str::trim).filter(|f| !f.is_empty()) {
        let what = format!("diff of {}", file);
        let diff = match bounded(config, &what, gateway.file_diff(&fix.id, file)).await {
            Ok(out) => out,
            Err(e) => {
                report.skip(fix, &what, &e);
                continue;
            }
        };

        for hunk in parse_hunks(file, &diff) {
            report.blame_queries += 1;
            let what = format!("blame of {}:{}+{}", hunk.file, hunk.start, hunk.count);
            match bounded(
                config,
                &what,
                gateway.blame(&parent, &hunk.file, hunk.start, hunk.count),
            )
            .await
            {
                Ok(out) => report.introducing.extend(parse_blame_output(&out)),
                Err(e) => report.skip(fix, &what, &e),
            }
        }
    }

    tracing::debug!("Fix {} traced to {} commits", fix, report.introducing.len());
    report
}

/// Apply the per-query timeout; expiry becomes `HistoryError::Timeout`.
async fn bounded<T>(
    config: &TraceConfig,
    what: &str,
    query: impl Future<Output = Result<T, HistoryError>>,
) -> Result<T, HistoryError> {
    match tokio::time::timeout(config.query_timeout, query).await {
        Ok(result) => result,
        Err(_) => Err(HistoryError::Timeout(config.query_timeout, what.to_string())),
    }
}

/// Old-side line ranges of a zero-context diff that have something to blame.
///
/// An omitted count means one line; a count of zero is a pure insertion and
/// is dropped.
pub fn parse_hunks(file: &str, diff: &str) -> Vec<DiffHunk> {
    diff.lines()
        .filter_map(|line| HUNK_HEADER.captures(line))
        .filter_map(|caps| {
            let start = caps.get(1)?.as_str().parse().ok()?;
            let count = match caps.get(2) {
                Some(m) => m.as_str().parse().ok()?,
                None => 1,
            };
            Some(DiffHunk {
                file: file.to_string(),
                start,
                count,
            })
        })
        .filter(|hunk| hunk.count > 0)
        .collect()
}

/// Commit attributed to each line of `git blame` output.
///
/// The first token of every line is the commit id, possibly with a `^`
/// boundary marker; ids are reduced to their short form.
pub fn parse_blame_output(output: &str) -> Vec<ShortHash> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(|token| token.trim_start_matches('^'))
        .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_hexdigit()))
        .map(ShortHash::new)
        .collect()
}
