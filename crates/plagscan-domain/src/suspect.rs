//! Suspect pair module

use crate::SubjectId;
use std::cmp::Ordering;

/// Default score at or above which a pair is reported as suspect
pub const DEFAULT_SUSPECT_THRESHOLD: f64 = 80.0;

/// Two subjects whose similarity meets the suspect threshold
#[derive(Debug, Clone, PartialEq)]
pub struct SuspectPair {
    /// First subject (earlier in matrix order)
    pub subject_a: SubjectId,
    /// Second subject
    pub subject_b: SubjectId,
    /// Similarity in percent
    pub score: f64,
}

impl SuspectPair {
    /// Create a suspect pair
    pub fn new(subject_a: impl Into<SubjectId>, subject_b: impl Into<SubjectId>, score: f64) -> Self {
        Self {
            subject_a: subject_a.into(),
            subject_b: subject_b.into(),
            score,
        }
    }

    /// Report ordering: descending score, then `(subject_a, subject_b)` ascending
    pub fn rank(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.subject_a.cmp(&other.subject_a))
            .then_with(|| self.subject_b.cmp(&other.subject_b))
    }
}
