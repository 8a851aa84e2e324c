//! gitrisk
//!
//! Scores how likely a commit is to introduce a bug, trained on the
//! repository's own history: fix commits are traced back through diff and
//! blame to the commits that introduced the lines they changed.

pub mod commands;
pub mod config;
pub mod dataset;
pub mod error;
pub mod history;
pub mod pipeline;

pub use config::{parse_utc_offset, RiskConfig};
pub use dataset::{assemble, feature_row, LabeledCommit, LabeledDataset, FEATURE_NAMES};
pub use error::{RiskError, RiskResult};
pub use pipeline::{Prediction, RiskPipeline, TrainSummary};
