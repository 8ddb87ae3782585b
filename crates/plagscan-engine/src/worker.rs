//! Background worker that runs analyses off the async executor

use crate::analysis::Analyzer;
use crate::matrix_builder::CancelFlag;
use crate::report::AnalysisReport;
use crate::{EngineConfig, EngineError, Result};
use plagscan_domain::Corpus;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Runs analyses on tokio's blocking pool
///
/// The matrix build is CPU-bound, so it never runs on the async executor.
/// Each run gets its own cancellation flag, checked between pairs.
///
/// # Examples
///
/// ```no_run
/// use plagscan_engine::{AnalysisWorker, EngineConfig};
/// use plagscan_store::DocumentStore;
/// use tokio;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let corpus = DocumentStore::new(["alice.py", "bob.py"]).load();
///     let worker = AnalysisWorker::new(EngineConfig::default())?;
///
///     // Runs until finished or Ctrl+C
///     let report = worker.run(corpus).await?;
///     println!("{}", report.summary.summary());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AnalysisWorker {
    analyzer: Arc<Analyzer>,
}

impl AnalysisWorker {
    /// Create a worker, validating the configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        Ok(Self::with_analyzer(Analyzer::new(config)?))
    }

    /// Create a worker with default configuration
    pub fn default_config() -> Self {
        Self::with_analyzer(Analyzer::default_config())
    }

    /// Wrap an existing analyzer
    pub fn with_analyzer(analyzer: Analyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
        }
    }

    /// The analyzer runs are executed with
    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Start an analysis in the background
    pub fn spawn(&self, corpus: Corpus) -> AnalysisHandle {
        self.spawn_with_cancel(corpus, CancelFlag::new())
    }

    /// Start an analysis that stops when `cancel` is set
    pub fn spawn_with_cancel(&self, corpus: Corpus, cancel: CancelFlag) -> AnalysisHandle {
        let analyzer = Arc::clone(&self.analyzer);
        let flag = cancel.clone();

        tracing::debug!("Spawning analysis of {} document(s)", corpus.len());
        let task = tokio::task::spawn_blocking(move || analyzer.analyze_corpus_with_cancel(corpus, &flag));

        AnalysisHandle { cancel, task }
    }

    /// Run an analysis to completion, cancelling it on Ctrl+C
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Cancelled`] if the signal arrived before the
    /// last pair was computed.
    pub async fn run(&self, corpus: Corpus) -> Result<AnalysisReport> {
        let AnalysisHandle { cancel, mut task } = self.spawn(corpus);

        tokio::select! {
            joined = &mut task => joined.map_err(|e| EngineError::Worker(e.to_string()))?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received, cancelling analysis");
                cancel.cancel();
                task.await.map_err(|e| EngineError::Worker(e.to_string()))?
            }
        }
    }
}

/// Handle to a running analysis
#[derive(Debug)]
pub struct AnalysisHandle {
    cancel: CancelFlag,
    task: JoinHandle<Result<AnalysisReport>>,
}

impl AnalysisHandle {
    /// Request cancellation; takes effect before the next pair
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// The run's cancellation flag
    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    /// Whether the run has finished
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the run's report
    pub async fn wait(self) -> Result<AnalysisReport> {
        self.task
            .await
            .map_err(|e| EngineError::Worker(e.to_string()))?
    }
}
