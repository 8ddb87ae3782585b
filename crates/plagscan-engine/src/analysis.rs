//! Analysis orchestration: load, build, classify, report

use crate::aligner::PairwiseAligner;
use crate::config::{EngineConfig, UnreadablePolicy};
use crate::matrix_builder::{CancelFlag, DocumentSlot, SimilarityMatrixBuilder};
use crate::report::{find_suspects, AnalysisReport, AnalysisSummary, CorpusStatus};
use crate::{EngineError, Result};
use plagscan_domain::traits::DocumentSource;
use plagscan_domain::{Corpus, ThresholdClassifier};
use std::collections::BTreeMap;
use std::time::Instant;

/// Runs complete analyses with one validated configuration
///
/// # Examples
///
/// ```
/// use plagscan_domain::{Corpus, Document};
/// use plagscan_engine::{Analyzer, EngineConfig};
///
/// let analyzer = Analyzer::new(EngineConfig::default()).unwrap();
///
/// let mut corpus = Corpus::new();
/// corpus.insert(Document::new("alice", "print('hello world')"));
/// corpus.insert(Document::new("bob", "print('hello world!')"));
///
/// let report = analyzer.analyze_corpus(corpus).unwrap();
/// assert_eq!(report.suspects.len(), 1);
/// println!("{}", report.summary.summary());
/// ```
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: EngineConfig,
    classifier: ThresholdClassifier,
    builder: SimilarityMatrixBuilder,
}

impl Analyzer {
    /// Create an analyzer, validating the configuration before any work starts
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let classifier = config.classifier()?;
        let builder = SimilarityMatrixBuilder::new(PairwiseAligner::new(config.autojunk));
        Ok(Self {
            config,
            classifier,
            builder,
        })
    }

    /// Create an analyzer with default configuration
    pub fn default_config() -> Self {
        Self {
            config: EngineConfig::default(),
            classifier: ThresholdClassifier::default(),
            builder: SimilarityMatrixBuilder::default(),
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Load documents from a source and analyze them
    pub fn analyze<S>(&self, source: &S) -> Result<AnalysisReport>
    where
        S: DocumentSource,
        S::Error: std::fmt::Display,
    {
        let corpus = source
            .load_corpus()
            .map_err(|e| EngineError::Source(e.to_string()))?;
        self.analyze_corpus(corpus)
    }

    /// Analyze an already-loaded corpus
    pub fn analyze_corpus(&self, corpus: Corpus) -> Result<AnalysisReport> {
        self.analyze_corpus_with_cancel(corpus, &CancelFlag::new())
    }

    /// Analyze a corpus, stopping between pairs if `cancel` is set
    ///
    /// Load failures are handled per the configured policy. Fewer than two
    /// documents is not an error: the report is flagged `InsufficientData`.
    pub fn analyze_corpus_with_cancel(&self, corpus: Corpus, cancel: &CancelFlag) -> Result<AnalysisReport> {
        if self.config.on_unreadable == UnreadablePolicy::Abort {
            if let Some(failure) = corpus.failures.first() {
                return Err(EngineError::DocumentUnreadable {
                    subject: failure.subject.clone(),
                    reason: failure.reason.clone(),
                });
            }
        }

        let status = if corpus.len() < 2 {
            tracing::warn!("Insufficient data: {} document(s) loaded, need at least 2", corpus.len());
            CorpusStatus::InsufficientData
        } else {
            CorpusStatus::Complete
        };

        let start = Instant::now();
        let build = {
            let mut slots: BTreeMap<_, _> = corpus
                .documents
                .iter()
                .map(|(subject, document)| (subject.clone(), DocumentSlot::Loaded(document)))
                .collect();

            if status == CorpusStatus::Complete && self.config.on_unreadable == UnreadablePolicy::Include {
                for failure in &corpus.failures {
                    slots
                        .entry(failure.subject.clone())
                        .or_insert(DocumentSlot::Unreadable);
                }
            }
            self.builder.build_slots(&slots, cancel)?
        };
        let elapsed = start.elapsed();

        let suspects = match status {
            CorpusStatus::Complete => find_suspects(&build.matrix, self.config.suspect_threshold),
            CorpusStatus::InsufficientData => Vec::new(),
        };

        let stats = build.matrix.stats();
        let summary = AnalysisSummary {
            documents_loaded: corpus.len(),
            failed_loads: corpus.failures.len(),
            measured_pairs: stats.measured_pairs,
            failed_pairs: stats.failed_pairs,
            suspects: suspects.len(),
            mean_score: stats.mean,
            elapsed,
        };
        tracing::info!(
            "Analysis finished: {} measured, {} failed, {} suspect(s) in {:?}",
            summary.measured_pairs,
            summary.failed_pairs,
            summary.suspects,
            elapsed
        );

        Ok(AnalysisReport {
            status,
            suspects,
            load_failures: corpus.failures.clone(),
            summary,
            suspect_threshold: self.config.suspect_threshold,
            build,
            corpus,
            classifier: self.classifier,
        })
    }
}
