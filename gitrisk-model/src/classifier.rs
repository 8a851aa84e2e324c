//! Binary classifier capability
//!
//! The pipeline only ever needs two operations from a model: learn from a
//! labeled feature matrix, and report per-class probabilities for new rows.

use crate::error::{ModelError, Result};

/// Probability pair for a single row: `[p(clean), p(bug)]`.
pub type ClassProbabilities = [f64; 2];

/// A binary classifier over dense `f64` feature rows.
pub trait Classifier {
    /// Train on `features` (one row per example) and boolean `labels`.
    fn fit(&mut self, features: &[Vec<f64>], labels: &[bool]) -> Result<()>;

    /// Per-class probabilities for each row, in input order.
    fn predict_proba(&self, features: &[Vec<f64>]) -> Result<Vec<ClassProbabilities>>;
}

/// Check that a training set is non-empty, rectangular and matches its labels.
///
/// Returns the row width.
pub fn validate_training_set(features: &[Vec<f64>], labels: &[bool]) -> Result<usize> {
    if features.is_empty() {
        return Err(ModelError::EmptyTrainingSet);
    }
    if features.len() != labels.len() {
        return Err(ModelError::shape(format!(
            "{} feature rows but {} labels",
            features.len(),
            labels.len()
        )));
    }
    validate_rows(features, features[0].len())?;
    Ok(features[0].len())
}

/// Check that every row has exactly `width` columns.
pub fn validate_rows(features: &[Vec<f64>], width: usize) -> Result<()> {
    if let Some((idx, row)) = features.iter().enumerate().find(|(_, r)| r.len() != width) {
        return Err(ModelError::shape(format!(
            "row {} has {} columns, expected {}",
            idx,
            row.len(),
            width
        )));
    }
    Ok(())
}
