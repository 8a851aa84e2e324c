//! `git log --stat` parsing into commit records.

use super::types::{CommitRecord, ShortHash};
use super::HistoryError;
use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

/// A line that opens a new log entry.
static COMMIT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^commit ([0-9a-fA-F]{40})$").expect("valid regex"));

static CHANGED_FILES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+) files? changed").expect("valid regex"));
static INSERTIONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+) insertions?\(\+\)").expect("valid regex"));
static DELETIONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+) deletions?\(-\)").expect("valid regex"));

/// Indentation git applies to every message line.
const MESSAGE_INDENT: &str = "    ";

/// Date layouts accepted on the `Date:` line, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%a %b %e %H:%M:%S %Y %z", // git default
    "%Y-%m-%d %H:%M:%S %z",    // --date=iso
];

/// Split whole-history log text into one string per commit entry.
///
/// Each entry starts at a `commit <sha>` line and runs up to (not including)
/// the next one. Joining the entries with `\n` gives back the input lines,
/// minus anything that preceded the first commit line.
pub fn split_entries(log: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut current: Option<Vec<&str>> = None;
    let mut preamble = 0usize;

    for line in log.lines() {
        if COMMIT_LINE.is_match(line) {
            if let Some(lines) = current.take() {
                entries.push(lines.join("\n"));
            }
            current = Some(vec![line]);
        } else if let Some(lines) = current.as_mut() {
            lines.push(line);
        } else if !line.trim().is_empty() {
            preamble += 1;
        }
    }

    if let Some(lines) = current {
        entries.push(lines.join("\n"));
    }

    if preamble > 0 {
        tracing::debug!("Ignored {} line(s) before the first commit entry", preamble);
    }

    entries
}

/// Parse one log entry.
///
/// `index` identifies the entry in error messages; `offset` is the reference
/// timezone every timestamp is normalized to.
pub fn parse_entry(
    entry: &str,
    index: usize,
    offset: FixedOffset,
) -> Result<CommitRecord, HistoryError> {
    let lines: Vec<&str> = entry.lines().collect();
    let malformed = |reason: &str| HistoryError::Parse {
        entry: index,
        header: lines.first().map(|l| l.to_string()).unwrap_or_default(),
        reason: reason.to_string(),
    };

    let hash = lines
        .iter()
        .find_map(|line| COMMIT_LINE.captures(line))
        .and_then(|caps| caps.get(1))
        .map(|m| ShortHash::new(m.as_str()))
        .ok_or_else(|| malformed("missing commit line"))?;

    let date_str = lines
        .iter()
        .find_map(|line| line.strip_prefix("Date:"))
        .map(str::trim)
        .ok_or_else(|| malformed("missing Date: line"))?;
    let timestamp = parse_date(date_str)
        .ok_or_else(|| malformed(&format!("unrecognized date '{}'", date_str)))?
        .with_timezone(&offset);

    let message = lines
        .iter()
        .filter(|line| line.starts_with(MESSAGE_INDENT))
        .map(|line| line.trim_start())
        .collect::<Vec<_>>()
        .join("\n");

    let mut record = CommitRecord {
        hash,
        timestamp,
        day_of_week: timestamp.weekday().num_days_from_monday(),
        hour: timestamp.hour(),
        message_len: message.chars().count(),
        changed_files: None,
        insertions: None,
        deletions: None,
    };

    // Merge entries carry no stat line; their statistics stay absent.
    if lines.iter().any(|line| line.starts_with("Merge:")) {
        return Ok(record);
    }

    if let Some(stat_line) = lines
        .iter()
        .rev()
        .find(|line| !line.trim().is_empty())
        .filter(|line| !line.starts_with(MESSAGE_INDENT))
    {
        record.changed_files = capture_count(&CHANGED_FILES, stat_line);
        record.insertions = capture_count(&INSERTIONS, stat_line);
        record.deletions = capture_count(&DELETIONS, stat_line);
    }

    Ok(record)
}

/// Parse whole-history log text, aborting on the first malformed entry.
pub fn parse_log(log: &str, offset: FixedOffset) -> Result<Vec<CommitRecord>, HistoryError> {
    split_entries(log)
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_entry(entry, index, offset))
        .collect()
}

fn parse_date(s: &str) -> Option<DateTime<FixedOffset>> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(s).ok())
        .or_else(|| DateTime::parse_from_rfc2822(s).ok())
}

fn capture_count(re: &Regex, line: &str) -> Option<u32> {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
