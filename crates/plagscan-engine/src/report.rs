//! Suspect reporting and the per-run analysis report

use crate::aligner::Alignment;
use crate::fragment::{extract_fragments, matching_regions, Fragments, MatchRegion};
use crate::matrix_builder::{MatrixBuild, PairFailure};
use crate::{EngineError, Result};
use plagscan_domain::{
    CellStatus, Corpus, Document, LoadFailure, RiskTier, SimilarityMatrix, SubjectId, SuspectPair,
    ThresholdClassifier,
};
use std::time::Duration;

/// Pairs at or above `threshold`, strongest first
///
/// Only the upper triangle is scanned, so self-pairs and mirrored duplicates
/// never appear. Failed cells are never suspects. Ties are ordered by
/// `(subject_a, subject_b)`.
pub fn find_suspects(matrix: &SimilarityMatrix, threshold: f64) -> Vec<SuspectPair> {
    let subjects = matrix.subjects();
    let mut suspects: Vec<SuspectPair> = matrix
        .upper_triangle()
        .filter(|(_, _, cell)| cell.status == CellStatus::Measured && cell.score >= threshold)
        .map(|(i, j, cell)| SuspectPair::new(subjects[i].clone(), subjects[j].clone(), cell.score))
        .collect();

    suspects.sort_by(|a, b| a.rank(b));
    suspects
}

/// Whether the corpus had enough documents to compare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusStatus {
    /// At least two documents were compared
    Complete,
    /// Fewer than two documents were available; nothing was compared
    InsufficientData,
}

/// Counters for one analysis run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisSummary {
    /// Documents loaded successfully
    pub documents_loaded: usize,
    /// Documents that could not be loaded
    pub failed_loads: usize,
    /// Pairs with a measured score
    pub measured_pairs: usize,
    /// Pairs whose comparison failed
    pub failed_pairs: usize,
    /// Pairs at or above the suspect threshold
    pub suspects: usize,
    /// Mean measured score
    pub mean_score: Option<f64>,
    /// Wall time of the matrix build
    pub elapsed: Duration,
}

impl AnalysisSummary {
    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Analysis Summary".to_string(),
            "================".to_string(),
            format!("Documents loaded: {}", self.documents_loaded),
            format!("Failed loads: {}", self.failed_loads),
            format!("Measured pairs: {}", self.measured_pairs),
            format!("Failed pairs: {}", self.failed_pairs),
            format!("Suspect pairs: {}", self.suspects),
        ];
        if let Some(mean) = self.mean_score {
            lines.push(format!("Mean similarity: {:.2}%", mean));
        }
        lines.push(format!("Build time: {:.2}s", self.elapsed.as_secs_f64()));
        lines.join("\n")
    }
}

/// Everything produced by one analysis run
///
/// Owns the run's documents and alignments so fragments can be extracted on
/// demand without recomputation.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Corpus completeness
    pub status: CorpusStatus,
    /// Suspect pairs, strongest first
    pub suspects: Vec<SuspectPair>,
    /// Documents that could not be loaded
    pub load_failures: Vec<LoadFailure>,
    /// Run counters
    pub summary: AnalysisSummary,
    /// Threshold the suspects were selected with
    pub suspect_threshold: f64,
    pub(crate) build: MatrixBuild,
    pub(crate) corpus: Corpus,
    pub(crate) classifier: ThresholdClassifier,
}

impl AnalysisReport {
    /// The similarity matrix
    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.build.matrix
    }

    /// Pairs that could not be compared
    pub fn pair_failures(&self) -> &[PairFailure] {
        &self.build.failures
    }

    /// Whether fewer than two documents were available
    pub fn is_insufficient(&self) -> bool {
        self.status == CorpusStatus::InsufficientData
    }

    /// Loaded document of a subject
    pub fn document(&self, subject: &str) -> Option<&Document> {
        self.corpus.documents.get(&SubjectId::from(subject))
    }

    /// Risk tier of cell (i, j); `None` for failed or out-of-range cells
    pub fn tier(&self, i: usize, j: usize) -> Option<RiskTier> {
        let cell = self.build.matrix.get(i, j)?;
        match cell.status {
            CellStatus::Failed => None,
            _ => Some(self.classifier.classify(cell.score)),
        }
    }

    /// Classifier used for tiers
    pub fn classifier(&self) -> &ThresholdClassifier {
        &self.classifier
    }

    /// Alignment between two subjects
    pub fn alignment(&self, a: &str, b: &str) -> Result<&Alignment> {
        let matrix = &self.build.matrix;
        let i = matrix.index_of(a).ok_or_else(|| EngineError::UnknownSubject(a.to_string()))?;
        let j = matrix.index_of(b).ok_or_else(|| EngineError::UnknownSubject(b.to_string()))?;
        self.build
            .alignment(i, j)
            .ok_or_else(|| EngineError::NoAlignment(SubjectId::from(a), SubjectId::from(b)))
    }

    /// Side-by-side body lines of a pair
    pub fn fragments(&self, a: &str, b: &str, header_marker: Option<&str>) -> Result<Fragments> {
        let (doc_a, doc_b, alignment) = self.pair(a, b)?;
        extract_fragments(doc_a, doc_b, alignment, header_marker)
    }

    /// Shared regions of a pair, at least `min_len` characters long
    pub fn regions(&self, a: &str, b: &str, header_marker: Option<&str>, min_len: usize) -> Result<Vec<MatchRegion>> {
        let (doc_a, doc_b, alignment) = self.pair(a, b)?;
        matching_regions(doc_a, doc_b, alignment, header_marker, min_len)
    }

    fn pair(&self, a: &str, b: &str) -> Result<(&Document, &Document, &Alignment)> {
        let alignment = self.alignment(a, b)?;
        let doc_a = self.document(a).ok_or_else(|| EngineError::UnknownSubject(a.to_string()))?;
        let doc_b = self.document(b).ok_or_else(|| EngineError::UnknownSubject(b.to_string()))?;
        Ok((doc_a, doc_b, alignment))
    }
}
