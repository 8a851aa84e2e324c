//! Runtime configuration.

use crate::history::{TraceConfig, DEFAULT_FIX_KEYWORDS};
use chrono::{FixedOffset, Offset, Utc};
use gitrisk_model::MODEL_FILE_NAME;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static UTC_OFFSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-])(\d{2}):?(\d{2})$").expect("valid regex"));

/// Configuration for training and scoring.
#[derive(Debug, Clone, Serialize)]
pub struct RiskConfig {
    /// Case-insensitive substrings that mark a commit message as a fix.
    pub fix_keywords: Vec<String>,
    /// Reference timezone for day-of-week/hour features, in seconds east of UTC.
    pub utc_offset_secs: i32,
    /// Concurrency and timeout settings for the tracer.
    pub trace: TraceConfig,
    /// Model file name, relative to the repository root.
    pub model_file: String,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            fix_keywords: DEFAULT_FIX_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            utc_offset_secs: 0,
            trace: TraceConfig::default(),
            model_file: MODEL_FILE_NAME.to_string(),
        }
    }
}

impl RiskConfig {
    /// The reference offset timestamps are normalized to.
    ///
    /// Out-of-range values fall back to UTC.
    pub fn reference_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_secs).unwrap_or_else(utc)
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// Parse `+HH:MM`, `-HHMM`, `Z` or `UTC` into seconds east of UTC.
pub fn parse_utc_offset(s: &str) -> Result<i32, String> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return Ok(0);
    }

    let caps = UTC_OFFSET
        .captures(s)
        .ok_or_else(|| format!("invalid UTC offset '{}', expected ±HH:MM", s))?;
    let hours: i32 = caps[2].parse().map_err(|_| format!("invalid hours in '{}'", s))?;
    let minutes: i32 = caps[3]
        .parse()
        .map_err(|_| format!("invalid minutes in '{}'", s))?;

    if hours > 23 || minutes > 59 {
        return Err(format!("UTC offset '{}' out of range", s));
    }

    let secs = hours * 3600 + minutes * 60;
    Ok(if &caps[1] == "-" { -secs } else { secs })
}
