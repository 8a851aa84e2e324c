//! Core history records shared by the parser, tracer and assembler.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Number of characters in the canonical short form of a commit id.
pub const SHORT_HASH_LEN: usize = 8;

/// Canonical 8-character commit identifier.
///
/// All comparisons and keys use this form; full hashes are truncated on
/// construction so a full and a short id never meet directly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShortHash(String);

impl ShortHash {
    /// Truncate `id` to its first 8 characters.
    ///
    /// Shorter ids are kept whole; surrounding whitespace is ignored.
    pub fn new(id: impl AsRef<str>) -> Self {
        let id = id.as_ref().trim();
        let end = id
            .char_indices()
            .nth(SHORT_HASH_LEN)
            .map(|(i, _)| i)
            .unwrap_or(id.len());
        Self(id[..end].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShortHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A fix commit as reported by git.
///
/// `id` is passed back to git verbatim so queries never hit an ambiguous
/// prefix; `hash` is the key used everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixCommit {
    pub id: String,
    pub hash: ShortHash,
}

impl FixCommit {
    pub fn new(id: impl AsRef<str>) -> Self {
        let id = id.as_ref().trim();
        Self {
            id: id.to_string(),
            hash: ShortHash::new(id),
        }
    }
}

impl fmt::Display for FixCommit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.hash, f)
    }
}

/// Structured features of one commit, parsed from a `git log --stat` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: ShortHash,
    /// Author date in the configured reference offset.
    pub timestamp: DateTime<FixedOffset>,
    /// 0 = Monday ... 6 = Sunday.
    pub day_of_week: u32,
    pub hour: u32,
    /// Character count of the commit message.
    pub message_len: usize,
    /// `None` when git reported no value (merges, or a zero category git omitted).
    pub changed_files: Option<u32>,
    pub insertions: Option<u32>,
    pub deletions: Option<u32>,
}

impl CommitRecord {
    /// Whether the diff statistics are all absent.
    pub fn has_no_stats(&self) -> bool {
        self.changed_files.is_none() && self.insertions.is_none() && self.deletions.is_none()
    }
}

/// Commit records keyed by short hash, in first-seen order.
///
/// Inserting a record whose hash is already present replaces the earlier
/// record in place.
#[derive(Debug, Clone, Default)]
pub struct CommitTable {
    records: Vec<CommitRecord>,
    index: HashMap<ShortHash, usize>,
}

impl CommitTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the one it replaced.
    pub fn insert(&mut self, record: CommitRecord) -> Option<CommitRecord> {
        match self.index.get(&record.hash) {
            Some(&pos) => Some(std::mem::replace(&mut self.records[pos], record)),
            None => {
                self.index.insert(record.hash.clone(), self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    pub fn get(&self, hash: &ShortHash) -> Option<&CommitRecord> {
        self.index.get(hash).map(|&pos| &self.records[pos])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommitRecord> {
        self.records.iter()
    }
}

impl FromIterator<CommitRecord> for CommitTable {
    fn from_iter<I: IntoIterator<Item = CommitRecord>>(iter: I) -> Self {
        let mut table = Self::new();
        for record in iter {
            table.insert(record);
        }
        table
    }
}

/// A range of lines a commit deleted or replaced, relative to its first parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiffHunk {
    pub file: String,
    pub start: u32,
    pub count: u32,
}

/// Deduplicated set of commits identified as introducing a bug.
///
/// Backed by a `BTreeSet` so iteration order is deterministic and union is
/// independent of the order fix commits were traced in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugIntroducingSet(BTreeSet<ShortHash>);

impl BugIntroducingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one hash; returns false if it was already present.
    pub fn insert(&mut self, hash: ShortHash) -> bool {
        self.0.insert(hash)
    }

    /// Merge another set into this one.
    pub fn union_with(&mut self, other: BugIntroducingSet) {
        self.0.extend(other.0);
    }

    pub fn contains(&self, hash: &ShortHash) -> bool {
        self.0.contains(hash)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShortHash> {
        self.0.iter()
    }
}

impl Extend<ShortHash> for BugIntroducingSet {
    fn extend<I: IntoIterator<Item = ShortHash>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<ShortHash> for BugIntroducingSet {
    fn from_iter<I: IntoIterator<Item = ShortHash>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
