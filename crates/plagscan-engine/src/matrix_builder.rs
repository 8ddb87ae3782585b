//! Similarity matrix construction over all subject pairs

use crate::aligner::{Alignment, PairwiseAligner};
use crate::{EngineError, Result};
use plagscan_domain::{Cell, Document, SimilarityMatrix, SubjectId};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag, checked between pair computations
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create an unset flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A subject as seen by the builder
#[derive(Debug, Clone, Copy)]
pub enum DocumentSlot<'d> {
    /// Loaded document
    Loaded(&'d Document),
    /// Document that could not be loaded; the subject stays in the matrix
    Unreadable,
}

impl<'d> DocumentSlot<'d> {
    fn document(&self) -> Option<&'d Document> {
        match self {
            DocumentSlot::Loaded(document) => Some(document),
            DocumentSlot::Unreadable => None,
        }
    }
}

/// A pair whose comparison failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairFailure {
    /// First subject (earlier in matrix order)
    pub subject_a: SubjectId,
    /// Second subject
    pub subject_b: SubjectId,
    /// Why the comparison failed
    pub reason: String,
}

/// Output of a matrix build: the matrix plus the alignments behind it
#[derive(Debug, Clone)]
pub struct MatrixBuild {
    /// Scores and statuses
    pub matrix: SimilarityMatrix,
    /// Pairs that could not be compared
    pub failures: Vec<PairFailure>,
    alignments: BTreeMap<(usize, usize), Alignment>,
}

impl MatrixBuild {
    /// Alignment for the pair (i, j) in either order
    ///
    /// The alignment is stored in matrix order (lower index first); callers
    /// that need the other orientation use [`Alignment::reversed`].
    pub fn alignment(&self, i: usize, j: usize) -> Option<&Alignment> {
        let key = if i < j { (i, j) } else { (j, i) };
        self.alignments.get(&key)
    }

    /// Alignment between two subjects by name
    pub fn alignment_between(&self, a: &str, b: &str) -> Option<&Alignment> {
        self.alignment(self.matrix.index_of(a)?, self.matrix.index_of(b)?)
    }

    /// Number of retained alignments
    pub fn alignment_count(&self) -> usize {
        self.alignments.len()
    }
}

/// Builds the N×N similarity matrix
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityMatrixBuilder {
    aligner: PairwiseAligner,
}

impl SimilarityMatrixBuilder {
    /// Create a builder around an aligner
    pub fn new(aligner: PairwiseAligner) -> Self {
        Self { aligner }
    }

    /// Build over loaded documents
    pub fn build(&self, documents: &BTreeMap<SubjectId, Document>) -> MatrixBuild {
        let slots = loaded_slots(documents);
        match self.build_slots(&slots, &CancelFlag::new()) {
            Ok(build) => build,
            // A fresh flag is never set
            Err(_) => unreachable!("build cancelled without a cancel request"),
        }
    }

    /// Build over loaded documents, honouring a cancellation flag
    pub fn build_cancellable(
        &self,
        documents: &BTreeMap<SubjectId, Document>,
        cancel: &CancelFlag,
    ) -> Result<MatrixBuild> {
        self.build_slots(&loaded_slots(documents), cancel)
    }

    /// Build over slots that may include unreadable subjects
    ///
    /// The aligner runs only for i < j; the mirrored cell is copied, which is
    /// identical to recomputing it because the aligner is symmetric. The flag
    /// is checked before each pair, never during one; a cancelled build
    /// returns no matrix at all.
    pub fn build_slots(
        &self,
        slots: &BTreeMap<SubjectId, DocumentSlot<'_>>,
        cancel: &CancelFlag,
    ) -> Result<MatrixBuild> {
        let subjects: Vec<SubjectId> = slots.keys().cloned().collect();
        let entries: Vec<DocumentSlot<'_>> = slots.values().copied().collect();
        let n = subjects.len();

        tracing::info!("Building {}x{} similarity matrix", n, n);

        let mut matrix = SimilarityMatrix::new(subjects.clone());
        let mut alignments = BTreeMap::new();
        let mut failures = Vec::new();

        for i in 0..n {
            for j in (i + 1)..n {
                if cancel.is_cancelled() {
                    tracing::info!("Matrix build cancelled before pair {}/{}", subjects[i], subjects[j]);
                    return Err(EngineError::Cancelled);
                }

                let outcome = self.aligner.try_align(
                    &subjects[i],
                    entries[i].document(),
                    &subjects[j],
                    entries[j].document(),
                );
                match outcome {
                    Ok((alignment, score)) => {
                        tracing::debug!("{} / {}: {:.2}%", subjects[i], subjects[j], score);
                        matrix.set_pair(i, j, Cell::measured(score));
                        alignments.insert((i, j), alignment);
                    }
                    Err(e) => {
                        tracing::warn!("{}", e);
                        matrix.set_pair(i, j, Cell::failed());
                        failures.push(PairFailure {
                            subject_a: subjects[i].clone(),
                            subject_b: subjects[j].clone(),
                            reason: failure_reason(e),
                        });
                    }
                }
            }
        }

        Ok(MatrixBuild {
            matrix,
            failures,
            alignments,
        })
    }
}

fn loaded_slots(documents: &BTreeMap<SubjectId, Document>) -> BTreeMap<SubjectId, DocumentSlot<'_>> {
    documents
        .iter()
        .map(|(subject, document)| (subject.clone(), DocumentSlot::Loaded(document)))
        .collect()
}

fn failure_reason(error: EngineError) -> String {
    match error {
        EngineError::ComparisonFailed { reason, .. } => reason,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plagscan_domain::CellStatus;

    fn corpus(entries: &[(&str, &str)]) -> BTreeMap<SubjectId, Document> {
        entries
            .iter()
            .map(|(name, text)| (SubjectId::from(*name), Document::new(*name, text)))
            .collect()
    }

    #[test]
    fn test_three_document_matrix_is_symmetric() {
        let documents = corpus(&[
            ("c", "for i in range(10): print(i)"),
            ("a", "for i in range(10): print(i * 2)"),
            ("b", "while True: break"),
        ]);
        let build = SimilarityMatrixBuilder::default().build(&documents);
        let matrix = &build.matrix;

        assert_eq!(matrix.len(), 3);
        let names: Vec<&str> = matrix.subjects().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        for i in 0..3 {
            assert_eq!(matrix.score(i, i), Some(100.0));
            for j in 0..3 {
                assert_eq!(matrix.score(i, j), matrix.score(j, i));
            }
        }
        assert_eq!(build.alignment_count(), 3);
    }

    #[test]
    fn test_mirrored_cell_equals_independent_computation() {
        let documents = corpus(&[("a", "abcabd"), ("b", "abdabc")]);
        let build = SimilarityMatrixBuilder::default().build(&documents);

        let aligner = PairwiseAligner::default();
        let (_, reverse) = aligner.align(&documents[&SubjectId::from("b")], &documents[&SubjectId::from("a")]);
        assert_eq!(build.matrix.score(1, 0).unwrap().to_bits(), reverse.to_bits());
    }

    #[test]
    fn test_alignment_lookup_either_order() {
        let documents = corpus(&[("a", "xyz"), ("b", "xyw")]);
        let build = SimilarityMatrixBuilder::default().build(&documents);

        let forward = build.alignment(0, 1).unwrap();
        let backward = build.alignment(1, 0).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward.subject_a().as_str(), "a");
        assert!(build.alignment(0, 0).is_none());
        assert!(build.alignment_between("b", "a").is_some());
    }

    #[test]
    fn test_unreadable_slot_produces_failed_cells() {
        let documents = corpus(&[("a", "same text"), ("c", "same text")]);
        let mut slots = loaded_slots(&documents);
        slots.insert(SubjectId::from("b"), DocumentSlot::Unreadable);

        let build = SimilarityMatrixBuilder::default()
            .build_slots(&slots, &CancelFlag::new())
            .unwrap();

        let matrix = &build.matrix;
        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.get(0, 1).unwrap().status, CellStatus::Failed);
        assert_eq!(matrix.get(1, 2).unwrap().status, CellStatus::Failed);
        assert_eq!(matrix.get(0, 2).unwrap().status, CellStatus::Measured);
        assert_eq!(matrix.score(0, 2), Some(100.0));
        assert_eq!(matrix.get(1, 1).unwrap().status, CellStatus::Diagonal);

        assert_eq!(build.failures.len(), 2);
        assert!(build.failures[0].reason.contains("'b'"));
        assert!(build.alignment(0, 1).is_none());
    }

    #[test]
    fn test_cancelled_build_returns_no_matrix() {
        let documents = corpus(&[("a", "one"), ("b", "two")]);
        let cancel = CancelFlag::new();
        cancel.cancel();

        let result = SimilarityMatrixBuilder::default().build_cancellable(&documents, &cancel);
        assert!(matches!(result, Err(EngineError::Cancelled)));
    }

    #[test]
    fn test_degenerate_corpora() {
        let builder = SimilarityMatrixBuilder::default();

        let empty = builder.build(&BTreeMap::new());
        assert!(empty.matrix.is_empty());

        let single = builder.build(&corpus(&[("a", "alone")]));
        assert_eq!(single.matrix.len(), 1);
        assert_eq!(single.matrix.score(0, 0), Some(100.0));
        assert_eq!(single.alignment_count(), 0);
    }
}
