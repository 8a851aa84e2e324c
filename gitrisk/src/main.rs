//! gitrisk command-line entry point
//!
//! - `gitrisk train`: learn from the repository's history and save a model
//! - `gitrisk predict [-c <commit>]`: score a commit with the saved model

use clap::{Parser, Subcommand};
use gitrisk::history::{GitExecutor, VcsGateway};
use gitrisk::{commands, parse_utc_offset, RiskConfig, RiskError};
use gitrisk_model::ModelStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gitrisk")]
#[command(about = "Score how likely a git commit is to introduce a bug")]
#[command(version)]
struct Args {
    /// Repository to operate on (defaults to the current directory)
    #[arg(long, short, global = true)]
    repo: Option<PathBuf>,

    /// Keyword marking a commit message as a fix (repeatable, default: bug, fix)
    #[arg(long = "keyword", short = 'k', global = true)]
    keywords: Vec<String>,

    /// Reference timezone for commit times, e.g. -06:00
    #[arg(long, global = true, value_parser = parse_utc_offset)]
    utc_offset: Option<i32>,

    /// Maximum number of concurrent history queries while tracing
    #[arg(long, short, global = true)]
    jobs: Option<usize>,

    /// Timeout for each history query, in seconds
    #[arg(long, global = true)]
    query_timeout: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train a model on the repository's history
    Train,
    /// Score a commit with the trained model
    Predict {
        /// Commit to score (defaults to the latest commit)
        #[arg(long, short)]
        commit: Option<String>,
    },
}

impl Args {
    fn config(&self) -> RiskConfig {
        let mut config = RiskConfig::default();
        if !self.keywords.is_empty() {
            config.fix_keywords = self.keywords.clone();
        }
        if let Some(offset) = self.utc_offset {
            config.utc_offset_secs = offset;
        }
        if let Some(jobs) = self.jobs {
            config.trace.max_concurrency = jobs.max(1);
        }
        if let Some(secs) = self.query_timeout {
            config.trace.query_timeout = Duration::from_secs(secs);
        }
        config
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let log_filter = match args.verbose {
        0 => "error",
        1 => "gitrisk=info,gitrisk_model=info",
        _ => "gitrisk=debug,gitrisk_model=debug",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(args).await {
        Ok(line) => println!("{}", line),
        Err(e) => {
            tracing::debug!("{:?}", e);
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}

async fn run(args: Args) -> Result<String, RiskError> {
    let config = args.config();
    if let Ok(json) = serde_json::to_string(&config) {
        tracing::debug!("Configuration: {}", json);
    }

    let repo = match args.repo {
        Some(path) => path,
        None => std::env::current_dir().map_err(gitrisk::history::HistoryError::from)?,
    };

    let executor = GitExecutor::new(&repo).await?;
    let root = executor.toplevel().await?;
    let store = ModelStore::new(root.join(&config.model_file));
    tracing::info!("Repository: {:?}", root);

    let gateway: Arc<dyn VcsGateway> = Arc::new(executor);

    match args.command {
        Command::Train => commands::train(gateway, &store, config).await,
        Command::Predict { commit } => commands::predict(gateway, &store, config, commit).await,
    }
}
