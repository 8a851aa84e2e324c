//! Train/score pipeline.
//!
//! Gateway → parser → commit table; gateway → identifier → tracer → bug set;
//! table + bug set → labeled dataset → classifier.

use crate::config::RiskConfig;
use crate::dataset::{assemble, feature_row, LabeledDataset};
use crate::error::{RiskError, RiskResult};
use crate::history::{
    find_fix_commits, parse_log, BugTracer, CommitTable, HistoryError, ShortHash, TraceReport,
    VcsGateway,
};
use gitrisk_model::Classifier;
use serde::Serialize;
use std::sync::Arc;

/// Outcome of a training run.
#[derive(Debug, Serialize)]
pub struct TrainSummary {
    pub examples: usize,
    pub positives: usize,
    pub fix_commits: usize,
    pub skipped_queries: usize,
}

/// Risk score of a single commit.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub commit: ShortHash,
    /// Probability that the commit introduced a bug.
    pub score: f64,
}

/// Runs the history stages against one repository.
pub struct RiskPipeline {
    gateway: Arc<dyn VcsGateway>,
    config: RiskConfig,
}

impl RiskPipeline {
    pub fn new(gateway: Arc<dyn VcsGateway>, config: RiskConfig) -> Self {
        Self { gateway, config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Parse the log of one commit, or of the whole history.
    pub async fn commit_table(&self, commit: Option<&str>) -> Result<CommitTable, HistoryError> {
        let log = self.gateway.log(commit).await?;
        let records = parse_log(&log, self.config.reference_offset())?;
        Ok(records.into_iter().collect())
    }

    /// Build the labeled dataset for the whole history.
    ///
    /// Fails before any tracing or labeling if the log is malformed or no
    /// fix commits exist.
    pub async fn labeled_dataset(&self) -> RiskResult<(LabeledDataset, TraceReport)> {
        let table = self.commit_table(None).await?;
        tracing::info!("Parsed {} commits", table.len());

        let fixes = find_fix_commits(self.gateway.as_ref(), &self.config.fix_keywords).await?;

        let tracer = BugTracer::new(Arc::clone(&self.gateway), self.config.trace.clone());
        let report = tracer.trace(&fixes).await;

        let dataset = assemble(&table, &report.introducing);
        Ok((dataset, report))
    }

    /// Fit `model` on the labeled history.
    pub async fn train(&self, model: &mut dyn Classifier) -> RiskResult<TrainSummary> {
        let (dataset, report) = self.labeled_dataset().await?;

        model.fit(&dataset.features(), &dataset.labels())?;

        let summary = TrainSummary {
            examples: dataset.len(),
            positives: dataset.positives(),
            fix_commits: report.fixes_traced,
            skipped_queries: report.warnings.len(),
        };
        if let Ok(json) = serde_json::to_string(&summary) {
            tracing::debug!("Training summary: {}", json);
        }

        Ok(summary)
    }

    /// Score one commit, defaulting to the latest.
    pub async fn score(&self, model: &dyn Classifier, commit: Option<&str>) -> RiskResult<Prediction> {
        let commit = match commit {
            Some(c) => c.to_string(),
            None => self.gateway.latest_commit().await?,
        };

        let table = self.commit_table(Some(&commit)).await?;
        let record = table
            .iter()
            .next()
            .ok_or_else(|| RiskError::CommitNotFound(commit.clone()))?;

        let probabilities = model.predict_proba(&[feature_row(record)])?;
        let score = probabilities
            .first()
            .map(|[_, bug]| *bug)
            .ok_or_else(|| RiskError::CommitNotFound(commit.clone()))?;

        Ok(Prediction {
            commit: record.hash.clone(),
            score,
        })
    }
}
