//! Feature/label assembly.
//!
//! Labels are decided on the raw records, where a missing statistic is still
//! `None`. Zero-filling happens afterwards and only on the feature rows
//! handed to the classifier.

use crate::history::{BugIntroducingSet, CommitRecord, CommitTable};
use serde::Serialize;

/// Column order of every feature row.
pub const FEATURE_NAMES: [&str; 6] = [
    "day_of_week",
    "hour",
    "message_len",
    "changed_files",
    "insertions",
    "deletions",
];

/// A commit record and whether it introduced a bug.
#[derive(Debug, Clone, Serialize)]
pub struct LabeledCommit {
    pub record: CommitRecord,
    pub label: bool,
}

/// Labeled commits in commit-table order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LabeledDataset {
    rows: Vec<LabeledCommit>,
}

impl LabeledDataset {
    pub fn rows(&self) -> &[LabeledCommit] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of bug-introducing commits.
    pub fn positives(&self) -> usize {
        self.rows.iter().filter(|r| r.label).count()
    }

    pub fn labels(&self) -> Vec<bool> {
        self.rows.iter().map(|r| r.label).collect()
    }

    /// Zero-filled feature rows, aligned with `labels()`.
    pub fn features(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(|r| feature_row(&r.record)).collect()
    }
}

/// Join the commit table against the bug-introducing set.
pub fn assemble(table: &CommitTable, bugs: &BugIntroducingSet) -> LabeledDataset {
    let rows = table
        .iter()
        .map(|record| LabeledCommit {
            label: bugs.contains(&record.hash),
            record: record.clone(),
        })
        .collect();

    LabeledDataset { rows }
}

/// Numeric features of one record, missing statistics filled with zero.
pub fn feature_row(record: &CommitRecord) -> Vec<f64> {
    let fill = |v: Option<u32>| f64::from(v.unwrap_or(0));
    vec![
        f64::from(record.day_of_week),
        f64::from(record.hour),
        record.message_len as f64,
        fill(record.changed_files),
        fill(record.insertions),
        fill(record.deletions),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{parse_log, ShortHash};
    use chrono::FixedOffset;

    const LOG: &str = "\
commit 6a3d1e8c0b1f2e3d4c5b6a7980716253443526ab
Merge: 910cdb3 bbb59ea
Author: Henry Hinnefeld <henry.hinnefeld@gmail.com>
Date:   Sun Feb 4 15:55:45 2018 -0600

    Merge pull request #10 from hinnefe2/write_readme

commit c668b98e0b1f2e3d4c5b6a7980716253443526ab
Author: Henry Hinnefeld <henry.hinnefeld@gmail.com>
Date:   Sat Feb 3 10:00:00 2018 +0000

    Add parser

 src/parser.rs | 13 ++++++++++---
 2 files changed, 10 insertions(+), 3 deletions(-)
";

    fn table() -> CommitTable {
        let utc = FixedOffset::east_opt(0).unwrap();
        parse_log(LOG, utc).unwrap().into_iter().collect()
    }

    #[test]
    fn test_labels_follow_bug_set() {
        let bugs: BugIntroducingSet = [ShortHash::new("c668b98e")].into_iter().collect();
        let dataset = assemble(&table(), &bugs);

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.labels(), vec![false, true]);
        assert_eq!(dataset.positives(), 1);
    }

    #[test]
    fn test_merge_filled_only_after_labeling() {
        let bugs: BugIntroducingSet = [ShortHash::new("6a3d1e8c")].into_iter().collect();
        let dataset = assemble(&table(), &bugs);

        let merge = &dataset.rows()[0];
        assert!(merge.label);
        // the labeled record keeps its missing statistics
        assert!(merge.record.has_no_stats());

        let features = dataset.features();
        assert_eq!(&features[0][3..], &[0.0, 0.0, 0.0]);
        assert_eq!(&features[1][3..], &[2.0, 10.0, 3.0]);
    }

    #[test]
    fn test_feature_row_layout() {
        let table = table();
        let record = table.get(&ShortHash::new("c668b98e")).unwrap();
        let row = feature_row(record);

        assert_eq!(row.len(), FEATURE_NAMES.len());
        // Saturday 10:00 UTC
        assert_eq!(row[0], 5.0);
        assert_eq!(row[1], 10.0);
        assert_eq!(row[2], "Add parser".len() as f64);
    }

    #[test]
    fn test_empty_bug_set_labels_nothing() {
        let dataset = assemble(&table(), &BugIntroducingSet::new());
        assert_eq!(dataset.positives(), 0);
        assert_eq!(dataset.features().len(), dataset.labels().len());
    }
}
