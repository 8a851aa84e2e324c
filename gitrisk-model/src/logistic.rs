//! Logistic regression classifier
//!
//! Full-batch gradient descent over standardized features, with L2
//! regularization and optional balanced class weights. Bug-introducing
//! commits are usually a small minority of a history, so balancing is on by
//! default.

use serde::{Deserialize, Serialize};

use crate::classifier::{validate_rows, validate_training_set, ClassProbabilities, Classifier};
use crate::error::{ModelError, Result};

/// Columns with a standard deviation below this are left unscaled.
const MIN_SCALE: f64 = 1e-12;

/// Training hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticConfig {
    /// Gradient descent step size.
    pub learning_rate: f64,
    /// Number of full passes over the training set.
    pub epochs: usize,
    /// L2 penalty applied to the weights (not the bias).
    pub l2_reg: f64,
    /// Reweight examples so both classes contribute equally.
    pub balance_classes: bool,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            epochs: 500,
            l2_reg: 0.001,
            balance_classes: true,
        }
    }
}

/// Learned parameters, present only after a successful `fit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FittedParams {
    weights: Vec<f64>,
    bias: f64,
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl FittedParams {
    fn standardize(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(self.scales.iter()))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect()
    }

    fn probability(&self, standardized: &[f64]) -> f64 {
        let logit: f64 = standardized
            .iter()
            .zip(self.weights.iter())
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.bias;
        sigmoid(logit)
    }
}

/// Binary logistic regression model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogisticRegression {
    config: LogisticConfig,
    params: Option<FittedParams>,
}

impl LogisticRegression {
    /// Create an unfitted model with default hyperparameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unfitted model with the given hyperparameters
    pub fn with_config(config: LogisticConfig) -> Self {
        Self {
            config,
            params: None,
        }
    }

    /// Whether `fit` has completed successfully
    pub fn is_fitted(&self) -> bool {
        self.params.is_some()
    }

    /// Number of input features the fitted model expects
    pub fn n_features(&self) -> Option<usize> {
        self.params.as_ref().map(|p| p.weights.len())
    }

    /// Learned weights in standardized feature space
    pub fn weights(&self) -> Option<&[f64]> {
        self.params.as_ref().map(|p| p.weights.as_slice())
    }
}

impl Classifier for LogisticRegression {
    fn fit(&mut self, features: &[Vec<f64>], labels: &[bool]) -> Result<()> {
        let width = validate_training_set(features, labels)?;
        let n = features.len() as f64;

        let (means, scales) = column_moments(features, width);
        let mut params = FittedParams {
            weights: vec![0.0; width],
            bias: 0.0,
            means,
            scales,
        };
        let rows: Vec<Vec<f64>> = features.iter().map(|r| params.standardize(r)).collect();

        let positives = labels.iter().filter(|&&l| l).count() as f64;
        let negatives = n - positives;
        let (pos_weight, neg_weight) =
            if self.config.balance_classes && positives > 0.0 && negatives > 0.0 {
                (n / (2.0 * positives), n / (2.0 * negatives))
            } else {
                (1.0, 1.0)
            };
        let total_weight = positives * pos_weight + negatives * neg_weight;

        for _ in 0..self.config.epochs {
            let mut grad_w = vec![0.0; width];
            let mut grad_b = 0.0;

            for (row, &label) in rows.iter().zip(labels) {
                let (target, sample_weight) = if label {
                    (1.0, pos_weight)
                } else {
                    (0.0, neg_weight)
                };
                let err = (params.probability(row) - target) * sample_weight;
                for (g, x) in grad_w.iter_mut().zip(row) {
                    *g += err * x;
                }
                grad_b += err;
            }

            let lr = self.config.learning_rate;
            for (w, g) in params.weights.iter_mut().zip(&grad_w) {
                *w -= lr * (g / total_weight + self.config.l2_reg * *w);
            }
            params.bias -= lr * grad_b / total_weight;
        }

        log::debug!(
            "Fitted logistic regression on {} examples ({} positive), bias {:.4}",
            features.len(),
            positives,
            params.bias
        );

        self.params = Some(params);
        Ok(())
    }

    fn predict_proba(&self, features: &[Vec<f64>]) -> Result<Vec<ClassProbabilities>> {
        let params = self.params.as_ref().ok_or(ModelError::NotFitted)?;
        validate_rows(features, params.weights.len())?;

        Ok(features
            .iter()
            .map(|row| {
                let p = params.probability(&params.standardize(row));
                [1.0 - p, p]
            })
            .collect())
    }
}

/// Per-column mean and population standard deviation.
fn column_moments(features: &[Vec<f64>], width: usize) -> (Vec<f64>, Vec<f64>) {
    let n = features.len() as f64;
    let mut means = vec![0.0; width];
    for row in features {
        for (m, x) in means.iter_mut().zip(row) {
            *m += x / n;
        }
    }

    let mut scales = vec![0.0; width];
    for row in features {
        for ((s, x), m) in scales.iter_mut().zip(row).zip(&means) {
            *s += (x - m) * (x - m) / n;
        }
    }
    for s in scales.iter_mut() {
        *s = s.sqrt();
        if *s < MIN_SCALE {
            *s = 1.0;
        }
    }

    (means, scales)
}

/// Numerically stable logistic function
fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
