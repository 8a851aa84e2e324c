//! gitrisk Model Layer
//!
//! Classifier capability and persistence for commit risk scoring.
//!
//! ## Features
//!
//! - **Classifier trait** - the two operations the pipeline needs (`fit`, `predict_proba`)
//! - **Logistic regression** - standardized, L2-regularized, class-balanced
//! - **Per-repository persistence** - one versioned model file at the repository root
//!
//! ## Example
//!
//! ```ignore
//! use gitrisk_model::{Classifier, LogisticRegression, ModelStore};
//!
//! let mut model = LogisticRegression::new();
//! model.fit(&features, &labels)?;
//!
//! let store = ModelStore::for_repository(&repo_root);
//! store.save(&model)?;
//!
//! let model: LogisticRegression = store.load()?;
//! let [_, p_bug] = model.predict_proba(&[row])?[0];
//! ```

pub mod classifier;
pub mod error;
pub mod logistic;
pub mod storage;

// Re-exports for convenience
pub use classifier::{ClassProbabilities, Classifier};
pub use error::ModelError;
pub use logistic::{LogisticConfig, LogisticRegression};
pub use storage::{ModelStore, MODEL_FILE_NAME};
