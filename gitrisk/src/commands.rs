//! The `train` and `predict` commands.
//!
//! Each returns the one line printed on success.

use crate::config::RiskConfig;
use crate::error::RiskResult;
use crate::history::VcsGateway;
use crate::pipeline::RiskPipeline;
use gitrisk_model::{LogisticRegression, ModelStore};
use std::sync::Arc;

/// Train a model on the full history and save it to `store`.
pub async fn train(
    gateway: Arc<dyn VcsGateway>,
    store: &ModelStore,
    config: RiskConfig,
) -> RiskResult<String> {
    let pipeline = RiskPipeline::new(gateway, config);
    let mut model = LogisticRegression::new();

    let summary = pipeline.train(&mut model).await?;
    store.save(&model)?;

    if summary.skipped_queries > 0 {
        tracing::info!(
            "{} history queries were skipped while tracing",
            summary.skipped_queries
        );
    }

    Ok(format!(
        "Model trained on {} training examples with {} positive cases",
        summary.examples, summary.positives
    ))
}

/// Score `commit` (default: the latest commit) with the saved model.
pub async fn predict(
    gateway: Arc<dyn VcsGateway>,
    store: &ModelStore,
    config: RiskConfig,
    commit: Option<String>,
) -> RiskResult<String> {
    // A missing model is reported before any history is read.
    let model: LogisticRegression = store.load()?;

    let pipeline = RiskPipeline::new(gateway, config);
    let prediction = pipeline.score(&model, commit.as_deref()).await?;

    Ok(format!(
        "Commit {} has a bug score of {:.4} / 1.0",
        prediction.commit, prediction.score
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RiskError;
    use crate::history::testing::FakeGateway;
    use tempfile::TempDir;

    const FIX: &str = "dc95b21a00000000000000000000000000000000";

    const HISTORY: &str = "\
commit dc95b21a00000000000000000000000000000000
Author: Jane Doe <jane@example.com>
Date:   Mon Feb 5 09:00:00 2018 +0000

    fix: off-by-one in parser

 src/parser.rs | 2 +-
 1 file changed, 1 insertion(+), 1 deletion(-)

commit c668b98e0b1f2e3d4c5b6a7980716253443526ab
Author: Jane Doe <jane@example.com>
Date:   Sat Feb 3 10:00:00 2018 +0000

    Add parser

 src/parser.rs | 13 +++++++++++++
 1 file changed, 13 insertions(+)
";

    const LATEST: &str = "\
commit dc95b21a00000000000000000000000000000000
Author: Jane Doe <jane@example.com>
Date:   Mon Feb 5 09:00:00 2018 +0000

    fix: off-by-one in parser

 src/parser.rs | 2 +-
 1 file changed, 1 insertion(+), 1 deletion(-)
";

    fn repo() -> FakeGateway {
        FakeGateway::new()
            .with_latest("dc95b21a00000000000000000000000000000000")
            .with_log(None, HISTORY)
            .with_log(Some("dc95b21a00000000000000000000000000000000"), LATEST)
            .with_fixes(&[FIX])
            .with_changed_files(FIX, &["src/parser.rs"])
            .with_diff(FIX, "src/parser.rs", "@@ -7 +7 @@ fn parse()")
            .with_blame(
                &format!("{}^", FIX),
                "src/parser.rs",
                7,
                1,
                "c668b98e0b1f2e3d4c5b6a7980716253443526ab 7)     let end = len + 1;",
            )
    }

    fn store(dir: &TempDir) -> ModelStore {
        ModelStore::for_repository(dir.path())
    }

    #[tokio::test]
    async fn test_train_then_predict() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let gateway: Arc<dyn VcsGateway> = Arc::new(repo());

        let line = train(gateway.clone(), &store, RiskConfig::default())
            .await
            .unwrap();
        assert_eq!(line, "Model trained on 2 training examples with 1 positive cases");
        assert!(store.exists());

        let line = predict(gateway, &store, RiskConfig::default(), None)
            .await
            .unwrap();
        assert!(line.starts_with("Commit dc95b21a has a bug score of "));
        assert!(line.ends_with(" / 1.0"));

        let score: f64 = line
            .trim_start_matches("Commit dc95b21a has a bug score of ")
            .trim_end_matches(" / 1.0")
            .parse()
            .unwrap();
        assert!((0.0..=1.0).contains(&score));
    }

    #[tokio::test]
    async fn test_train_without_fixes_saves_nothing() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let gateway = Arc::new(FakeGateway::new().with_log(None, HISTORY).with_fixes(&[]));

        let err = train(gateway, &store, RiskConfig::default())
            .await
            .unwrap_err();
        assert!(err
            .user_message()
            .starts_with("Failed to find any bug commits by parsing commit logs"));
        assert!(!store.exists());
    }

    #[test]
    fn test_predict_without_model_reads_no_history() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let gateway = Arc::new(repo());

        let err = tokio_test::block_on(predict(
            gateway.clone(),
            &store,
            RiskConfig::default(),
            Some("dc95b21a".to_string()),
        ))
        .unwrap_err();

        assert!(matches!(err, RiskError::Model(ref e) if e.is_missing_model()));
        assert_eq!(
            err.user_message(),
            "could not find trained model. have you run \"gitrisk train\" yet?"
        );
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_predict_unknown_commit() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let gateway: Arc<dyn VcsGateway> = Arc::new(repo());

        train(gateway.clone(), &store, RiskConfig::default())
            .await
            .unwrap();

        let err = predict(gateway, &store, RiskConfig::default(), Some("ffffffff".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, RiskError::History(_)));
    }
}
