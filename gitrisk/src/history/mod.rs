//! Repository history mining.
//!
//! This module provides functionality to:
//! - Query git for logs, fix commits, diffs and blame
//! - Parse `git log --stat` output into commit records
//! - Identify fix commits and trace them back to bug-introducing commits

mod error;
mod executor;
mod gateway;
mod identifier;
mod parser;
mod tracer;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use error::HistoryError;
pub use executor::GitExecutor;
pub use gateway::VcsGateway;
pub use identifier::{find_fix_commits, DEFAULT_FIX_KEYWORDS};
pub use parser::{parse_entry, parse_log, split_entries};
pub use tracer::{parse_blame_output, parse_hunks, BugTracer, TraceConfig, TraceReport};
pub use types::{
    BugIntroducingSet, CommitRecord, CommitTable, DiffHunk, FixCommit, ShortHash,
    SHORT_HASH_LEN,
};
